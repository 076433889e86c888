fn main() -> anyhow::Result<()> {
    promptmatch_lib::run()
}
