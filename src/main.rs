use anyhow::Result;

fn main() -> Result<()> {
    repolens::cli::run()
}
