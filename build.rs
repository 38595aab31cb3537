use clap::CommandFactory;

// Include the CLI definition
include!("src/cli/args.rs");

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=src/cli/args.rs");

    let out_dir = match std::env::var_os("OUT_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => return Ok(()),
    };

    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buffer: Vec<u8> = Default::default();

    // Render the man page
    man.render(&mut buffer)?;

    std::fs::write(out_dir.join("tagtree.1"), buffer)?;

    Ok(())
}
