fn main() {
    topicsh::app::startup::startup();
}
