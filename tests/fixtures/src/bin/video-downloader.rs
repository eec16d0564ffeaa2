fn main() {
    println!("mock video downloader");
}
