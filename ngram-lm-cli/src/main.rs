use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use ngram_lm_core::corpus::{CorpusError, CorpusProvider, FileCorpus};
use ngram_lm_core::model::{NGramModel, START_TOKEN};

mod web;

use web::{DEFAULT_URL, WebCorpus};

#[derive(Parser, Debug)]
#[command(name = "ngram-lm")]
#[command(about = "Train an n-gram language model on a scraped corpus and query it")]
#[command(version)]
struct Args {
    /// Order of the model (n)
    #[arg(short, long, default_value_t = 3)]
    order: usize,

    /// Exact number of corpus tokens to train on
    #[arg(long, default_value_t = 1000)]
    min_words: usize,

    /// Page to build the corpus from
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    /// Read the corpus from a local file instead of the web
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Maximum number of generated words
    #[arg(long, default_value_t = 10)]
    max_len: usize,

    /// Sentence to score (asked on stdin when missing)
    #[arg(short, long)]
    sentence: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if args.file.is_none() {
        println!("Fetching corpus from {}...", args.url);
    }
    let corpus = provider(&args)?.tokens()?;
    println!("Corpus size: {} words", corpus.len());

    let mut model = NGramModel::new(args.order)?;
    model.train(&corpus);

    let example = example_ngram(args.order, &corpus);
    println!("{}-gram probability example:", args.order);
    println!("P({:?}) = {:.6}", example, model.prob(&example)?);

    println!("\nGenerated text:");
    println!("{}", model.generate_text(args.max_len));

    let sentence = match args.sentence {
        Some(sentence) => sentence,
        None => prompt("\nEnter a sentence to compute its probability: ")?,
    };
    println!("Probability of the sentence: {:.10}", model.sentence_prob(&sentence));

    Ok(())
}

/// Picks the corpus source: `--file` when given, the web page otherwise.
/// Any provider works, the model only sees the tokens.
fn provider(args: &Args) -> Result<Box<dyn CorpusProvider>, CorpusError> {
    Ok(match &args.file {
        Some(path) => Box::new(FileCorpus::new(path).with_min_words(args.min_words)),
        None => Box::new(WebCorpus::new(&args.url, args.min_words)?),
    })
}

/// The first corpus word right after the start padding: `<s> .. <s> corpus[0]`.
fn example_ngram(order: usize, corpus: &[String]) -> Vec<&str> {
    let mut example: Vec<&str> = vec![START_TOKEN; order.saturating_sub(1)];
    example.push(corpus.first().map_or("", String::as_str));
    example
}

/// Prints `message` and reads one line from stdin.
fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end().to_owned())
}
