use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use marquee::quickstart::{synchronize, FormState, PageVariant};
use marquee::releases::{asset_title, size_kb, ReleaseClient};
use marquee::{build_site, Config};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(
    author,
    version,
    about = "Static project-site tooling: quickstart generator, release downloads, HTML includes"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to marquee.toml (default: walk up from the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the site locally
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Expand includes across the site directory into an output directory
    Build {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        out: PathBuf,
    },

    /// Fetch the latest release and print its download links
    Releases {
        /// Repository to query, "owner/repo" (overrides config)
        #[arg(short, long)]
        repo: Option<String>,

        /// Print the payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the command line the quickstart form would generate
    Quickstart {
        /// Project name
        #[arg(long, default_value = "")]
        project: String,

        /// Include asset conversion
        #[arg(long)]
        assets: bool,

        /// Include patch data
        #[arg(long)]
        patch: bool,

        /// Include a texture set
        #[arg(long)]
        textures: bool,

        /// Include maps
        #[arg(long)]
        maps: bool,

        /// Version control system, e.g. "git"
        #[arg(long)]
        scm: Option<String>,

        /// Include a run target
        #[arg(long)]
        run: bool,

        /// Also list the sections the page would reveal
        #[arg(long)]
        sections: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let result = match args.command {
        Command::Serve { port } => cmd_serve(config, port),
        Command::Build { out } => cmd_build(&config, &out),
        Command::Releases { repo, json } => cmd_releases(&config, repo, json),
        Command::Quickstart {
            project,
            assets,
            patch,
            textures,
            maps,
            scm,
            run,
            sections,
        } => cmd_quickstart(
            &config, project, assets, patch, textures, maps, scm, run, sections,
        ),
        Command::Completion { shell } => {
            generate(shell, &mut Args::command(), "marquee", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(message) = result {
        eprintln!("{} {}", "error:".red().bold(), message);
        std::process::exit(1);
    }
}

fn cmd_serve(mut config: Config, port: Option<u16>) -> Result<(), String> {
    if let Some(port) = port {
        config.server.port = port;
    }
    marquee::serve::start_site_server(&config).map_err(|e| format!("Server error: {}", e))
}

fn cmd_build(config: &Config, out: &Path) -> Result<(), String> {
    let site_root = &config.site.root;
    if !site_root.exists() {
        return Err(format!(
            "Site directory '{}' does not exist",
            site_root.display()
        ));
    }

    let summary = build_site(site_root, out).map_err(|e| e.to_string())?;
    eprintln!(
        "{} expanded {} page(s), copied {} file(s) to {}",
        "done:".green().bold(),
        summary.pages,
        summary.copied,
        out.display()
    );
    Ok(())
}

fn cmd_releases(config: &Config, repo: Option<String>, json: bool) -> Result<(), String> {
    let repo = repo
        .or_else(|| config.github.repo.clone())
        .ok_or_else(|| {
            "No repository given. Pass --repo owner/repo or set github.repo in marquee.toml."
                .to_string()
        })?;

    let release = ReleaseClient::new(&repo)
        .latest()
        .map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::to_string_pretty(&release).map_err(|e| e.to_string())?;
        println!("{}", payload);
        return Ok(());
    }

    match release.published_date() {
        Some(date) => println!("{} {}", release.name.bold(), format!("({})", date).dimmed()),
        None => println!("{}", release.name.bold()),
    }
    for asset in &release.assets {
        println!(
            "  {:<34} {} {}",
            asset_title(&asset.name),
            asset.name.dimmed(),
            format!("{} KB", size_kb(asset.size)).dimmed()
        );
    }
    Ok(())
}

fn cmd_quickstart(
    config: &Config,
    project: String,
    assets: bool,
    patch: bool,
    textures: bool,
    maps: bool,
    scm: Option<String>,
    run: bool,
    sections: bool,
) -> Result<(), String> {
    let form = FormState {
        project,
        assets: flag_value(assets, "assets"),
        patch: flag_value(patch, "patch"),
        textures: flag_value(textures, "textures"),
        maps: flag_value(maps, "maps"),
        scm: scm.unwrap_or_default(),
        run: flag_value(run, "run"),
    };

    let variant = PageVariant::standard(&config.quickstart.program);
    let plan = synchronize(&variant, &form);

    println!("{}", plan.command_line(&variant.program));
    if sections {
        for name in plan.visible_sections.iter() {
            println!("{}", name);
        }
    }
    Ok(())
}

fn flag_value(set: bool, value: &str) -> String {
    if set {
        value.to_string()
    } else {
        String::new()
    }
}
