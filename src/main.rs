fn main() {
    sitewatch::cli::run()
}
