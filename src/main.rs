use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vitae::resolver::{theme_filter, ThemeResolver};
use vitae::{document, pdf, render, validate, Error, RenderedOutput};

#[derive(Parser)]
#[command(
    name = "vitae",
    version,
    about = "Render JSON Resume documents with pluggable themes"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the resume (the default command)
    #[command(alias = "export")]
    Render {
        /// Resume file to render
        #[arg(default_value = "resume.json")]
        filename: PathBuf,

        /// Output filename; a .pdf extension selects PDF capture
        #[arg(short, long, default_value = "resume.html")]
        output: PathBuf,

        /// Theme to use, if more than one is installed
        #[arg(short, long)]
        theme: Option<String>,

        /// Extra launch flag for the PDF browser (repeatable)
        #[arg(long = "browser-arg")]
        browser_args: Vec<String>,
    },

    /// Create a sample resume
    #[command(alias = "create")]
    Init {
        #[arg(default_value = "resume.json")]
        filename: PathBuf,
    },

    /// Validate the resume against the schema
    Validate {
        #[arg(default_value = "resume.json")]
        filename: PathBuf,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Render {
            filename: PathBuf::from("resume.json"),
            output: PathBuf::from("resume.html"),
            theme: None,
            browser_args: Vec::new(),
        }
    }
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    if let Err(err) = run(cli.command.unwrap_or_default()) {
        report(&err);
        std::process::exit(1);
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Render {
            filename,
            output,
            theme,
            browser_args,
        } => render_command(&filename, &output, theme.as_deref(), &browser_args),
        Command::Init { filename } => {
            document::init(&filename)
                .with_context(|| format!("could not write {}", filename.display()))?;
            println!(
                "Done! Start editing {} now, and run the render command when you are ready.",
                filename.display()
            );
            Ok(())
        }
        Command::Validate { filename } => {
            let resume = document::read_resume(&filename)?;
            validate::validate(&resume)?;
            println!("Your {} looks amazing!", filename.display());
            Ok(())
        }
    }
}

fn render_command(
    filename: &Path,
    output: &Path,
    theme: Option<&str>,
    browser_args: &[String],
) -> anyhow::Result<()> {
    let resume = document::read_resume(filename)?;

    // Precedence: --theme beats the meta.theme hint beats match-all.
    let filter = theme_filter(theme, &resume);
    let resolver = ThemeResolver::new(std::env::current_dir()?);
    let themes = resolver.resolve(filter.as_deref())?;

    let selected = themes.first().ok_or(Error::NoThemeFound)?;
    if themes.len() > 1 {
        println!(
            "Found {} themes installed, defaulting to {}. Pass the --theme option if you would like to use another one.",
            themes.len(),
            selected.name
        );
    }

    let rendered = render(&resume, selected.module.as_ref())?;

    let rendered = if wants_pdf(output) {
        let html = rendered.as_text().ok_or_else(|| {
            Error::ThemeRender("theme produced binary output, cannot capture a PDF".to_string())
        })?;
        RenderedOutput::Binary(pdf::capture(
            html,
            &resume,
            selected.module.as_ref(),
            browser_args,
        )?)
    } else {
        rendered
    };

    document::write_output(output, &rendered)
        .with_context(|| format!("could not write {}", output.display()))?;
    println!("You can find your rendered resume at {}. Nice work!", output.display());
    Ok(())
}

fn wants_pdf(output: &Path) -> bool {
    matches!(
        output.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("pdf")
    )
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<Error>() {
        Some(Error::Validation(issues)) => {
            eprintln!("Uh-oh! The following errors were found:");
            for issue in issues {
                let path = if issue.path.is_empty() { "<root>" } else { issue.path.as_str() };
                eprintln!("  {} at {}", issue.message, path);
            }
        }
        Some(Error::NoThemeFound) => {
            eprintln!("Could not find a resume theme to render.");
            eprintln!(
                "Try installing one (e.g. `npm install jsonresume-theme-even`) and run the command again."
            );
        }
        _ => eprintln!("error: {:#}", err),
    }
}
