//! segtool: cut, tag and extract keywords from the command line.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use libsegment_core::dict::{DictTrie, UserWordWeight};
use libsegment_core::unicode::words_to_strings;
use libsegment_core::{Config, Segmentor};

#[derive(Parser)]
#[command(about = "Chinese word segmentation and keyword extraction")]
struct Args {
    /// TOML config with dictionary/model paths; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    dict: Option<PathBuf>,

    #[arg(long)]
    hmm_model: Option<PathBuf>,

    /// User dictionary paths joined by `|` or `;`.
    #[arg(long)]
    user_dict: Option<String>,

    #[arg(long)]
    idf: Option<PathBuf>,

    #[arg(long)]
    stop_words: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum CutMode {
    Mix,
    Mp,
    Hmm,
    Full,
    Query,
}

#[derive(Clone, Copy, ValueEnum)]
enum KeywordMethod {
    Tfidf,
    Textrank,
}

#[derive(Subcommand)]
enum Command {
    /// Segment a sentence.
    Cut {
        sentence: String,
        #[arg(long, value_enum, default_value = "mix")]
        mode: CutMode,
        /// Disable the HMM pass (mix and query modes).
        #[arg(long)]
        no_hmm: bool,
        /// Word-length cap in runes (mp mode).
        #[arg(long, default_value_t = libsegment_core::MAX_WORD_LENGTH)]
        max_word_len: usize,
    },
    /// Segment and POS-tag a sentence.
    Tag { sentence: String },
    /// Extract top-N keywords.
    Keywords {
        sentence: String,
        #[arg(long, default_value_t = 5)]
        top_n: usize,
        #[arg(long, value_enum, default_value = "tfidf")]
        method: KeywordMethod,
        #[arg(long, default_value_t = libsegment_core::textrank::DEFAULT_SPAN)]
        span: usize,
        #[arg(long, default_value_t = libsegment_core::textrank::DEFAULT_RANK_ITERS)]
        rank_iters: usize,
    },
    /// Convert a text dictionary into the prepared binary form.
    Prepare {
        #[arg(long)]
        out: PathBuf,
    },
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dict) = &args.dict {
        config.dict_path = dict.clone();
    }
    if let Some(model) = &args.hmm_model {
        config.hmm_model_path = model.clone();
    }
    if args.user_dict.is_some() {
        config.user_dict_paths = args.user_dict.clone();
    }
    if let Some(idf) = &args.idf {
        config.idf_path = Some(idf.clone());
    }
    if let Some(stop) = &args.stop_words {
        config.stop_words_path = Some(stop.clone());
    }
    if config.dict_path.as_os_str().is_empty() {
        bail!("no dictionary given: pass --dict or --config");
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    if let Command::Prepare { out } = &args.command {
        let dict = DictTrie::from_files(&config.dict_path, None, UserWordWeight::default())?;
        dict.save_prepared(out)?;
        println!("wrote prepared dictionary to {}", out.display());
        return Ok(());
    }

    if config.hmm_model_path.as_os_str().is_empty() {
        bail!("no hmm model given: pass --hmm-model or --config");
    }
    let segmentor = Segmentor::from_config(&config).context("build segmentor")?;

    match args.command {
        Command::Cut {
            sentence,
            mode,
            no_hmm,
            max_word_len,
        } => {
            let words = match mode {
                CutMode::Mix => segmentor.cut(&sentence, !no_hmm),
                CutMode::Mp => segmentor.cut_small(&sentence, max_word_len),
                CutMode::Hmm => segmentor.cut_hmm(&sentence),
                CutMode::Full => segmentor.cut_all(&sentence),
                CutMode::Query => segmentor.cut_for_search(&sentence, !no_hmm),
            };
            println!("{}", words_to_strings(&words).join("/"));
        }
        Command::Tag { sentence } => {
            let tags: Vec<String> = segmentor
                .tag(&sentence)
                .into_iter()
                .map(|(word, tag)| format!("{word}:{tag}"))
                .collect();
            println!("{}", tags.join(", "));
        }
        Command::Keywords {
            sentence,
            top_n,
            method,
            span,
            rank_iters,
        } => {
            let keywords = match method {
                KeywordMethod::Tfidf => segmentor.extract_tfidf(&sentence, top_n),
                KeywordMethod::Textrank => {
                    segmentor.extract_textrank_with(&sentence, top_n, span, rank_iters)
                }
            };
            for kw in keywords {
                println!("{}\t{:.5}\t{:?}", kw.word, kw.weight, kw.offsets);
            }
        }
        Command::Prepare { .. } => unreachable!("handled above"),
    }
    Ok(())
}
