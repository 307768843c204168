fn main() -> anyhow::Result<()> {
    brewlog::run()?;
    Ok(())
}
