use anyhow::Result;
use clap::{Parser, Subcommand};
use notice_qa_lib::commands::{ask, find_pdfs, open_pdf};
use notice_qa_lib::{ConversationState, Fetcher, LinkEntry, Settings};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(Parser)]
#[command(name = "notice-qa", version, about = "Ask questions about the PDF attachments of a notice page")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the PDF attachments linked from a page
    Links {
        /// Notice page URL
        url: String,
    },
    /// Pick a PDF from a page and ask questions about it
    Chat {
        /// Notice page URL
        url: String,

        /// 1-based index of the PDF to open instead of asking
        #[arg(long)]
        select: Option<usize>,
    },
}

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notice_qa_lib=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.settings.validate()?;
    let fetcher = cli.settings.fetcher()?;

    match cli.command {
        Command::Links { url } => {
            let links = find_pdfs(&fetcher, &cli.settings, &url).await?;
            if links.is_empty() {
                println!("No PDF attachments found on this page.");
            }
            for (i, link) in links.iter().enumerate() {
                println!("{:>3}. {}\n     {}", i + 1, link.label(), link.url());
            }
        }
        Command::Chat { url, select } => {
            cli.settings.require_credentials()?;
            if let Some(masked) = cli.settings.masked_api_key() {
                eprintln!("Using {} with key {}", cli.settings.model, masked);
            }
            chat(&cli.settings, &fetcher, &url, select).await?;
        }
    }

    Ok(())
}

async fn chat(settings: &Settings, fetcher: &Fetcher, url: &str, select: Option<usize>) -> Result<()> {
    let links = find_pdfs(fetcher, settings, url).await?;
    if links.is_empty() {
        println!("No PDF attachments found on this page (pages behind a login may not work).");
        return Ok(());
    }
    println!("Found {} PDF file(s):", links.len());
    for (i, link) in links.iter().enumerate() {
        println!("{:>3}. {}", i + 1, link.label());
    }

    let answerer = settings.answerer();
    let mut state = ConversationState::new();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut preselected = select;

    'session: loop {
        if !state.has_document() {
            let Some(entry) = choose(&links, &mut input, preselected.take()).await? else {
                break;
            };
            println!("Downloading and reading '{}'...", entry.label());
            if let Err(e) = open_pdf(fetcher, &mut state, entry).await {
                println!("Could not open '{}': {}", entry.label(), e);
                continue;
            }
            if let Some(greeting) = state.history().first() {
                println!("{}", greeting.message);
            }
            println!("(/reset picks another file, /quit exits)");
        }

        loop {
            let Some(line) = prompt(&mut input, "> ").await? else {
                break 'session;
            };
            match line.trim() {
                "" => continue,
                "/quit" => break 'session,
                "/reset" => {
                    state.reset();
                    continue 'session;
                }
                question => match ask(&answerer, &mut state, question).await {
                    Ok(answer) => println!("{}\n", answer),
                    Err(e) => println!("Error: {}\n", e),
                },
            }
        }
    }

    Ok(())
}

/// Pick a link by 1-based index, asking on stdin unless one was preselected.
async fn choose<'a>(
    links: &'a [LinkEntry],
    input: &mut InputLines,
    preselected: Option<usize>,
) -> Result<Option<&'a LinkEntry>> {
    if let Some(n) = preselected {
        if let Some(entry) = n.checked_sub(1).and_then(|i| links.get(i)) {
            return Ok(Some(entry));
        }
        println!("There is no file number {}.", n);
    }

    loop {
        let Some(line) = prompt(input, &format!("Select a file [1-{}]: ", links.len())).await? else {
            return Ok(None);
        };
        let line = line.trim();
        if line == "/quit" {
            return Ok(None);
        }
        match line.parse::<usize>().ok().and_then(|n| n.checked_sub(1)).and_then(|i| links.get(i)) {
            Some(entry) => return Ok(Some(entry)),
            None => println!("Enter a number between 1 and {}.", links.len()),
        }
    }
}

async fn prompt(input: &mut InputLines, text: &str) -> Result<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}
