// Man pages for `netsim` and each visible subcommand, written to
// `$OUT_DIR/man` as `netsim.1`, `netsim-console.1`, `netsim-links-add.1`, ...

use std::fs;
use std::path::Path;

use clap::{Command, CommandFactory};

// Only clap and clap_complete are needed to compile the argument tree.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = std::env::var_os("OUT_DIR").expect("OUT_DIR not set by Cargo");
    let man_dir = Path::new(&out_dir).join("man");
    fs::create_dir_all(&man_dir).expect("failed to create man output directory");

    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let name = cmd.get_name().to_owned();
        pending.extend(
            cmd.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .map(|sub| sub.clone().name(format!("{name}-{}", sub.get_name()))),
        );
        write_page(cmd, &man_dir.join(format!("{name}.1")));
    }
}

fn write_page(cmd: Command, path: &Path) {
    let mut page = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut page)
        .unwrap_or_else(|e| panic!("man page render failed for {}: {e}", path.display()));
    fs::write(path, page).unwrap_or_else(|e| panic!("cannot write {}: {e}", path.display()));
}
