use clap::CommandFactory;
use std::fs;
use std::io;
use std::path::Path;

fn main() -> io::Result<()> {
    let cmd = sensectl::cli::Cli::command();
    let man_dir = Path::new("man");
    fs::create_dir_all(man_dir)?;

    // One page per subcommand plus sensectl.1
    clap_mangen::generate_to(cmd, man_dir)?;

    let mut pages: Vec<_> = fs::read_dir(man_dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    pages.sort();
    for page in pages {
        println!("Generated {}", page.display());
    }

    Ok(())
}
