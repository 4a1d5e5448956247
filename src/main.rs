fn main() -> anyhow::Result<()> {
    popup_editor::run()?;
    Ok(())
}
