use anyhow::Result;
use std::path::Path;
use std::{env, process};

use wikichunk_config::Config;
use wikichunk_engine::extract::ids::UuidGenerator;
use wikichunk_engine::{ChunkKind, ChunkList, ChunkPayload, extract_elements, io, parse_document};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    match args.len() {
        // Single file: full chunk listing plus extraction summary.
        2 => {
            let path = Path::new(&args[1]);
            let content = io::read_file(path)?;
            let chunks = parse_document(&content);
            print_chunks(&chunks);
            print_extraction(&content);
        }
        // No argument: scan the configured corpus and summarize each file.
        1 => {
            let corpus_path = match Config::load() {
                Ok(Some(config)) => config.corpus_path,
                Ok(None) => {
                    eprintln!("Error: No file provided and no config file found");
                    eprintln!("Usage: {} [markup-file]", args[0]);
                    eprintln!(
                        "Or create a config file at {}",
                        Config::config_path().display()
                    );
                    process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: Failed to load config file: {e}");
                    process::exit(1);
                }
            };
            io::validate_corpus_dir(&corpus_path)?;
            for file in io::scan_wiki_files(&corpus_path)? {
                let content = io::read_file(&file)?;
                let chunks = parse_document(&content);
                println!("{}: {}", file.display(), summarize(&chunks));
            }
        }
        _ => {
            eprintln!("Usage: {} [markup-file]", args[0]);
            process::exit(1);
        }
    }

    Ok(())
}

fn print_chunks(chunks: &ChunkList) {
    println!("Parsed {} chunks\n", chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let preview: String = chunk.content.chars().take(40).collect();
        let preview = preview.replace('\n', " ");
        println!("{:>3}. {:?} | {preview}", i + 1, chunk.kind());
        if let ChunkPayload::Infobox {
            infobox_type,
            fields,
        } = &chunk.payload
        {
            println!("     type: {infobox_type}, fields: {}", fields.len());
            for (name, value) in fields {
                println!("       {name}: {value}");
            }
        }
    }
}

fn print_extraction(content: &str) {
    let extraction = extract_elements(content, &UuidGenerator);
    println!("\nExtracted {} elements", extraction.len());
    for element in extraction.registry.values() {
        println!("  {} -> {:?}", element.category.marker(&element.id), element.category);
    }
    println!("\nResidual text:\n{}", extraction.residual_text);
}

fn summarize(chunks: &ChunkList) -> String {
    let count = |kind| chunks.by_kind(kind).len();
    format!(
        "{} chunks ({} headings, {} paragraphs, {} tables, {} lists, {} infoboxes)",
        chunks.len(),
        count(ChunkKind::Heading),
        count(ChunkKind::Paragraph),
        count(ChunkKind::Table),
        count(ChunkKind::List),
        count(ChunkKind::Infobox),
    )
}
