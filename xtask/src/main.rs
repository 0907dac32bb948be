//! Developer tasks for seo-lint.
//!
//! ```text
//! cargo xtask man target/man
//! cargo xtask completions target/completions
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

const BIN_NAME: &str = "seo-lint";

#[derive(Parser)]
#[command(name = "xtask", about = "seo-lint developer tasks")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages (one per subcommand)
    Man {
        /// Output directory
        #[arg(default_value = "target/man")]
        out_dir: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Output directory
        #[arg(default_value = "target/completions")]
        out_dir: PathBuf,
        /// Shells to generate for (default: all)
        #[arg(long, value_enum)]
        shell: Vec<Shell>,
    },
}

fn main() -> anyhow::Result<()> {
    match Xtask::parse().task {
        Task::Man { out_dir } => man(&out_dir),
        Task::Completions { out_dir, shell } => completions(&out_dir, &shell),
    }
}

fn man(out_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("failed to create {}", out_dir.display()))?;

    let cmd = seo_lint::command();
    write_man(out_dir, BIN_NAME, cmd.clone())?;
    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        let name = format!("{BIN_NAME}-{}", sub.get_name());
        write_man(out_dir, &name, sub.clone().name(name.clone()))?;
    }
    println!("man pages written to {}", out_dir.display());
    Ok(())
}

fn write_man(out_dir: &Path, name: &str, cmd: clap::Command) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buf)
        .with_context(|| format!("failed to render man page for {name}"))?;
    let path = out_dir.join(format!("{name}.1"));
    fs::write(&path, buf).with_context(|| format!("failed to write {}", path.display()))
}

fn completions(out_dir: &Path, shells: &[Shell]) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("failed to create {}", out_dir.display()))?;

    let shells = if shells.is_empty() {
        Shell::value_variants()
    } else {
        shells
    };
    let mut cmd = seo_lint::command();
    for shell in shells {
        let path = clap_complete::generate_to(*shell, &mut cmd, BIN_NAME, out_dir)
            .with_context(|| format!("failed to generate {shell} completions"))?;
        println!("{}", path.display());
    }
    Ok(())
}
