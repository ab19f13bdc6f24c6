mod config;
mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use quadgen_core::{verify_vertex, Equation, KeyPoints, QuestionRecord};
use quadgen_llm::prompts::{
    extraction_user_prompt, generation_user_prompt, EXTRACTION_SYSTEM_PROMPT,
    GENERATION_SYSTEM_PROMPT,
};
use quadgen_llm::{strip_code_fences, ChatClient};
use quadgen_plot::{render_question, PlotOptions};

use config::{load_config, show_config_path, Config};

#[derive(Parser)]
#[command(
    name = "quadgen",
    version,
    about = "SAT quadratic-graph question pipeline: extract, generate, plot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract quadratic-equation questions from PDFs via one LLM call per page
    Extract {
        /// Directory containing source PDF documents
        #[arg(short, long)]
        docs: PathBuf,

        /// Output directory for per-page question text
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Maximum pages per document to send to the LLM
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Generate new quadratic-graph questions from few-shot examples
    Generate {
        /// JSON file with example question records
        #[arg(short, long)]
        examples: PathBuf,

        /// Output JSON file for the generated questions
        #[arg(short, long, default_value = "quad_questions.json")]
        out: PathBuf,

        /// Number of questions to request
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Plot one annotated parabola image per question record
    Plot {
        /// JSON file with question records
        #[arg(short, long)]
        questions: PathBuf,

        /// Output directory for graph images
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Check that each record's equation agrees with its stated vertex
    Check {
        /// JSON file with question records
        #[arg(short, long)]
        questions: PathBuf,
    },

    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    match cli.command {
        Commands::Extract {
            docs,
            out,
            max_pages,
        } => {
            let out = out.unwrap_or_else(|| PathBuf::from(&config.extract.output_dir));
            let max_pages = max_pages.unwrap_or(config.extract.max_pages);
            cmd_extract(&config, &docs, &out, max_pages)
        }
        Commands::Generate {
            examples,
            out,
            count,
        } => cmd_generate(&config, &examples, &out, count),
        Commands::Plot { questions, out } => {
            let out = out.unwrap_or_else(|| PathBuf::from(&config.plot.output_dir));
            let options = PlotOptions {
                width: config.plot.width,
                height: config.plot.height,
                samples: config.plot.samples,
            };
            cmd_plot(&questions, &out, &options)
        }
        Commands::Check { questions } => cmd_check(&questions),
        Commands::Config => cmd_config(&config),
    }
}

// ---------------------------------------------------------------------------
// Pipeline commands
// ---------------------------------------------------------------------------

fn cmd_extract(config: &Config, docs: &Path, out: &Path, max_pages: usize) -> Result<()> {
    let client = ChatClient::new(
        &config.llm.base_url,
        &config.llm.api_key()?,
        &config.llm.model,
        config.llm.extract_temperature,
    );

    let mut pdfs: Vec<PathBuf> = fs::read_dir(docs)
        .with_context(|| format!("reading docs directory {}", docs.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdfs.sort();

    if pdfs.is_empty() {
        bail!("no PDF documents found in {}", docs.display());
    }

    fs::create_dir_all(out)
        .with_context(|| format!("cannot create output directory {}", out.display()))?;

    let mut saved = 0;
    let mut failed = 0;
    for doc_path in &pdfs {
        let doc_name = doc_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let pages = match pdf::extract_pages(doc_path) {
            Ok(pages) => pages,
            Err(e) => {
                eprintln!("{doc_name}: {e:#}");
                failed += 1;
                continue;
            }
        };

        for page in pages.iter().take(max_pages) {
            let user_prompt = extraction_user_prompt(&page.text);
            // One malformed page or failed call must not stop the rest
            // of the document.
            let output = match client.chat(EXTRACTION_SYSTEM_PROMPT, &user_prompt) {
                Ok(output) => output,
                Err(e) => {
                    eprintln!("{doc_name} page {}: {e:#}", page.page_number);
                    failed += 1;
                    continue;
                }
            };

            let path = out.join(format!(
                "{doc_name}_page_{}_questions.txt",
                page.page_number
            ));
            fs::write(&path, &output)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{doc_name} page {}: {}", page.page_number, path.display());
            saved += 1;
        }
    }

    println!("saved {saved} page(s), {failed} failed");
    Ok(())
}

fn cmd_generate(config: &Config, examples: &Path, out: &Path, count: usize) -> Result<()> {
    let client = ChatClient::new(
        &config.llm.base_url,
        &config.llm.api_key()?,
        &config.llm.model,
        config.llm.generate_temperature,
    );

    let raw_examples = fs::read_to_string(examples)
        .with_context(|| format!("reading examples {}", examples.display()))?;
    let examples_value: Value = serde_json::from_str(&raw_examples)
        .with_context(|| format!("{} is not valid JSON", examples.display()))?;

    let user_prompt = generation_user_prompt(&examples_value.to_string(), count);
    let response = client.chat(GENERATION_SYSTEM_PROMPT, &user_prompt)?;

    let cleaned = strip_code_fences(&response);
    let generated: Value =
        serde_json::from_str(cleaned).context("LLM output is not valid JSON")?;
    if !generated.is_array() {
        bail!("LLM output is not a JSON array of question records");
    }

    fs::write(out, serde_json::to_string_pretty(&generated)?)
        .with_context(|| format!("writing {}", out.display()))?;
    println!(
        "wrote {} question(s) to {}",
        generated.as_array().map_or(0, Vec::len),
        out.display()
    );
    Ok(())
}

fn cmd_plot(questions: &Path, out: &Path, options: &PlotOptions) -> Result<()> {
    let records = load_records(questions)?;

    let mut rendered = 0;
    let mut skipped = 0;
    for (idx, value) in records.iter().enumerate() {
        let index = idx + 1;
        match plot_one(value, index, out, options) {
            Ok(path) => {
                println!("Q{index}: {}", path.display());
                rendered += 1;
            }
            Err(e) => {
                eprintln!("Q{index}: skipped: {e:#}");
                skipped += 1;
            }
        }
    }

    println!("rendered {rendered} graph(s), skipped {skipped}");
    Ok(())
}

fn plot_one(value: &Value, index: usize, out: &Path, options: &PlotOptions) -> Result<PathBuf> {
    let record: QuestionRecord =
        serde_json::from_value(value.clone()).context("record does not match question shape")?;
    render_question(&record, index, out, options)
}

fn cmd_check(questions: &Path) -> Result<()> {
    let records = load_records(questions)?;

    let mut ok = 0;
    let mut problems = 0;
    for (idx, value) in records.iter().enumerate() {
        let index = idx + 1;
        match check_one(value) {
            Ok(()) => {
                println!("Q{index}: ok");
                ok += 1;
            }
            Err(e) => {
                println!("Q{index}: {e:#}");
                problems += 1;
            }
        }
    }

    println!("{ok} consistent record(s), {problems} with problems");
    Ok(())
}

fn check_one(value: &Value) -> Result<()> {
    let record: QuestionRecord =
        serde_json::from_value(value.clone()).context("record does not match question shape")?;
    let equation = Equation::parse(&record.equation)?;
    let points = KeyPoints::from_features(&record.key_features)?;
    verify_vertex(&equation, &points)?;
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("config file: {}", show_config_path());
    println!();
    println!("[llm]");
    println!("base_url = {:?}", config.llm.base_url);
    println!("model = {:?}", config.llm.model);
    println!("api_key_env = {:?}", config.llm.api_key_env);
    println!("extract_temperature = {}", config.llm.extract_temperature);
    println!("generate_temperature = {}", config.llm.generate_temperature);
    println!();
    println!("[plot]");
    println!("output_dir = {:?}", config.plot.output_dir);
    println!("samples = {}", config.plot.samples);
    println!("width = {}", config.plot.width);
    println!("height = {}", config.plot.height);
    println!();
    println!("[extract]");
    println!("output_dir = {:?}", config.extract.output_dir);
    println!("max_pages = {}", config.extract.max_pages);
    Ok(())
}

/// Load the question JSON as raw values so one malformed record is
/// reported per index instead of failing the whole batch.
fn load_records(path: &Path) -> Result<Vec<Value>> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<Value> = serde_json::from_str(&data)
        .with_context(|| format!("{} is not a JSON array", path.display()))?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(equation: &str) -> Value {
        serde_json::json!({
            "question_choice": "What is the vertex?",
            "equation": equation,
            "key_features": {
                "vertex": "(3, 4)",
                "axis_of_symmetry": "x = 3",
                "x_intercepts": ["1.59", "4.41"],
                "y_intercept": "-14"
            }
        })
    }

    #[test]
    fn test_check_one_consistent() {
        assert!(check_one(&record_json("y = -2(x - 3)^2 + 4")).is_ok());
    }

    #[test]
    fn test_check_one_vertex_mismatch() {
        let err = check_one(&record_json("y = x^2")).unwrap_err();
        assert!(err.to_string().contains("vertex"), "{err:#}");
    }

    #[test]
    fn test_check_one_bad_equation() {
        assert!(check_one(&record_json("y = 2(x - 3")).is_err());
    }

    #[test]
    fn test_check_one_wrong_shape() {
        let err = check_one(&serde_json::json!({"not": "a record"})).unwrap_err();
        assert!(err.to_string().contains("question shape"), "{err:#}");
    }

    #[test]
    fn test_plot_batch_isolates_bad_records() {
        let dir = tempfile::tempdir().unwrap();
        let questions = dir.path().join("questions.json");
        let out = dir.path().join("graphs");
        std::fs::write(
            &questions,
            serde_json::to_string(&vec![
                record_json("y = -2(x - 3)^2 + 4"),
                record_json("y = 2(x - 3"), // unbalanced, must be skipped
                record_json("y = -2(x - 3)^2 + 4"),
            ])
            .unwrap(),
        )
        .unwrap();

        cmd_plot(&questions, &out, &PlotOptions::default()).unwrap();

        assert!(out.join("graph_question_1.png").exists());
        assert!(!out.join("graph_question_2.png").exists());
        assert!(out.join("graph_question_3.png").exists());
    }

    #[test]
    fn test_load_records_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"equation\": \"y = x^2\"}").unwrap();
        assert!(load_records(&path).is_err());
    }
}
