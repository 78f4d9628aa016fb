fn main() {
    hoop_shot::run();
}
