use crate::cli::opts::*;
use crate::config::AppConfig;
use crate::tui::app::TuiApp;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Local, Utc};
use lexicard_core::{
    filters::{filter_by_text, sort_by_phase, sort_recent},
    migrate,
    scheduler::select_due_words,
    stats::{daily_streak, local_day, mastered_count, phase_histogram, reviewed_on, summarize},
    transfer, CoreError, Difficulty, ReviewSession, SessionSummary, Storage, Word,
};
use lexicard_json::JsonStore;
use std::io::{stdin, stdout, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub fn run_cli(args: Cli, cfg: AppConfig) -> Result<()> {
    let repo = open_store(&cfg, args.store_path.as_deref())?;
    match args.cmd {
        Command::Tui => {
            let mut app = TuiApp::new(repo, cfg.scheduler()?);
            app.run()
        }
        Command::Add(a) => {
            let w = repo.add_word(&a.word, &a.definition, &a.example)?;
            println!("{}", w.id);
            Ok(())
        }
        Command::List(l) => list_cmd(&*repo, l),
        Command::Edit(e) => edit_cmd(&*repo, e),
        Command::Rm { word } => {
            let w = resolve_word(&*repo, &word)?;
            repo.remove_word(w.id)?;
            println!("ok");
            Ok(())
        }
        Command::Due => due_cmd(&*repo),
        Command::Review => review_cmd(repo, &cfg),
        Command::Stats => stats_cmd(&*repo, &cfg),
        Command::Export(cmd) => export_cmd(&*repo, cmd),
        Command::Import(cmd) => import_cmd(&*repo, &cfg, cmd),
        Command::Reset { yes } => {
            if !yes {
                bail!("this resets every word to phase 0; pass --yes to confirm");
            }
            repo.reset_progress(Utc::now())?;
            println!("ok");
            Ok(())
        }
        Command::Clear { yes } => {
            if !yes {
                bail!("this deletes every word and all progress; pass --yes to confirm");
            }
            repo.clear_all()?;
            println!("ok");
            Ok(())
        }
    }
}

pub fn open_store(cfg: &AppConfig, store_path: Option<&Path>) -> Result<Arc<dyn Storage>> {
    let (file, backups) = cfg.store_paths(store_path);
    let store = JsonStore::open_with(file, backups, cfg.max_backups, &cfg.interval_table()?)?;
    Ok(Arc::new(store))
}

fn list_cmd(repo: &dyn Storage, cmd: ListCmd) -> Result<()> {
    let progress = repo.list_progress()?;
    let mut words = repo.get_words()?;
    if let Some(q) = &cmd.query {
        words = filter_by_text(&words, q);
    }
    match cmd.sort {
        SortKey::Recent => sort_recent(&mut words),
        SortKey::Phase => sort_by_phase(&mut words, &progress),
    }
    for w in words {
        let p = progress.get(&w.id);
        let phase = p.map(|p| p.phase).unwrap_or(0);
        let reviews = p.map(|p| p.review_count).unwrap_or(0);
        let next = p.and_then(|p| p.next_review).map(fmt_date).unwrap_or_else(|| "-".into());
        println!(
            "{}\t{}\t{}\tphase={}\treviews={}\tnext={}",
            w.id, w.word, w.definition, phase, reviews, next
        );
    }
    Ok(())
}

fn edit_cmd(repo: &dyn Storage, e: WordEdit) -> Result<()> {
    let mut word = resolve_word(repo, &e.word)?;
    if let Some(t) = e.text {
        word.word = non_empty(&t, "word")?;
    }
    if let Some(d) = e.definition {
        word.definition = non_empty(&d, "definition")?;
    }
    if let Some(x) = e.example {
        word.example = x.trim().to_string();
    }
    repo.update_word(&word)?;
    println!("ok");
    Ok(())
}

fn due_cmd(repo: &dyn Storage) -> Result<()> {
    let now = Utc::now();
    let words = repo.get_words()?;
    let due = select_due_words(&words, &repo.list_progress()?, now);
    println!("{} due of {}", due.len(), words.len());
    for w in due {
        println!("{}\t{}", w.id, w.word);
    }
    Ok(())
}

fn review_cmd(repo: Arc<dyn Storage>, cfg: &AppConfig) -> Result<()> {
    let mut session = ReviewSession::new(repo, cfg.scheduler()?);
    let totals = session.start(Utc::now())?;
    if totals.total == 0 {
        println!("no words due");
        return Ok(());
    }
    let summary = review_loop(&mut session, &mut stdin().lock())?;
    print_summary(&summary);
    Ok(())
}

/// Drives `session` from `input` until it completes, the user quits, or
/// input runs out.
fn review_loop<R: BufRead>(session: &mut ReviewSession, input: &mut R) -> Result<SessionSummary> {
    while let Some(word) = session.current().cloned() {
        let t = session.totals();
        println!("\n[{}/{}] {}", t.completed + 1, t.total, word.word);
        if read_line(input, "[enter=show]")?.is_none() {
            break;
        }
        println!("definition: {}", word.definition);
        if !word.example.is_empty() {
            println!("example: {}", word.example);
        }
        println!("[1=forgot, 2=vague, 3=remembered, q=quit]");
        let difficulty = loop {
            let Some(line) = read_line(input, "rating> ")? else {
                return Ok(session.summary());
            };
            let answer = line.trim().to_lowercase();
            if answer == "q" || answer == "quit" {
                return Ok(session.summary());
            }
            match parse_difficulty(&answer) {
                Some(d) => break d,
                None => println!("enter 1/2/3 or q"),
            }
        };

        match session.submit_answer(difficulty, Utc::now()) {
            Ok(true) => break,
            Ok(false) => {
                if difficulty != Difficulty::Remembered {
                    println!("{}: back in the queue ({} left)", difficulty.label(), session.remaining());
                }
            }
            // The session did not move; the same word is asked again.
            Err(e) => eprintln!("could not save rating: {e}"),
        }
    }
    Ok(session.summary())
}

fn print_summary(s: &SessionSummary) {
    println!(
        "\nreviewed {} of {}, {} right first time ({}%)",
        s.completed, s.total, s.correct, s.accuracy
    );
}

fn stats_cmd(repo: &dyn Storage, cfg: &AppConfig) -> Result<()> {
    let now = Utc::now();
    let today = local_day(now);
    let words = repo.get_words()?;
    let progress = repo.list_progress()?;
    let reviews = repo.list_reviews()?;
    let summary = summarize(&reviews);
    let table_len = cfg.interval_table()?.len();

    println!("words\t{}", words.len());
    println!("due\t{}", select_due_words(&words, &progress, now).len());
    println!("mastered\t{}", mastered_count(&progress));
    println!("reviews\t{}", summary.totals.total);
    println!("today\t{}", reviewed_on(&reviews, today));
    println!("streak\t{}", daily_streak(&reviews, today));
    for d in [Difficulty::Forgot, Difficulty::Vague, Difficulty::Remembered] {
        let n = match d {
            Difficulty::Forgot => summary.totals.forgot,
            Difficulty::Vague => summary.totals.vague,
            Difficulty::Remembered => summary.totals.remembered,
        };
        println!("{}\t{}", d.label(), n);
    }
    println!("accuracy\t{:.0}%", summary.totals.accuracy() * 100.0);
    for (phase, n) in phase_histogram(&progress, table_len).iter().enumerate() {
        println!("phase {}\t{}", phase, n);
    }
    Ok(())
}

fn export_cmd(repo: &dyn Storage, cmd: ExportCmd) -> Result<()> {
    match cmd {
        ExportCmd::Json { path } => {
            let snapshot = transfer::export(repo, Utc::now())?;
            let s = serde_json::to_string_pretty(&snapshot)?;
            std::fs::write(&path, s)?;
            println!("wrote {}", path.display());
        }
        ExportCmd::Csv { path } => {
            let progress = repo.list_progress()?;
            let mut words = repo.get_words()?;
            words.sort_by_key(|w| w.created_at);

            let mut wtr = csv::Writer::from_path(&path)?;
            wtr.write_record(["word", "definition", "example", "phase", "review_count", "next_review", "completed"])?;
            for w in words {
                let p = progress.get(&w.id);
                wtr.write_record([
                    w.word,
                    w.definition,
                    w.example,
                    p.map(|p| p.phase).unwrap_or(0).to_string(),
                    p.map(|p| p.review_count).unwrap_or(0).to_string(),
                    p.and_then(|p| p.next_review).map(|t| t.to_rfc3339()).unwrap_or_default(),
                    if p.is_some_and(|p| p.completed) { "1".to_string() } else { "0".to_string() },
                ])?;
            }
            wtr.flush()?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn import_cmd(repo: &dyn Storage, cfg: &AppConfig, cmd: ImportCmd) -> Result<()> {
    match cmd {
        ImportCmd::Json { path } => {
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let doc: serde_json::Value = serde_json::from_str(&data)?;
            let upgraded = migrate::upgrade(doc, &cfg.interval_table()?, Utc::now())?;
            let report = transfer::import(repo, upgraded.snapshot)?;
            println!(
                "imported {} (skipped {}, new ids {})",
                report.added,
                report.skipped + upgraded.skipped,
                report.remapped + upgraded.remapped
            );
        }
        ImportCmd::Csv { path } => {
            let mut rdr = csv::Reader::from_path(&path)?;
            let (mut added, mut skipped) = (0usize, 0usize);
            for rec in rdr.records() {
                let rec = rec?;
                let word = rec.get(0).unwrap_or("");
                let definition = rec.get(1).unwrap_or("");
                let example = rec.get(2).unwrap_or("");
                match repo.add_word(word, definition, example) {
                    Ok(_) => added += 1,
                    Err(CoreError::Conflict(_)) | Err(CoreError::Invalid(_)) => {
                        tracing::warn!(word, "skipping csv row");
                        skipped += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            println!("imported {added} (skipped {skipped})");
        }
    }
    Ok(())
}

// ===== Helpers =====
pub fn parse_difficulty(s: &str) -> Option<Difficulty> {
    match s.trim().to_lowercase().as_str() {
        "1" | "f" | "forgot" | "-1" => Some(Difficulty::Forgot),
        "2" | "v" | "vague" | "0" => Some(Difficulty::Vague),
        "3" | "r" | "remembered" => Some(Difficulty::Remembered),
        _ => None,
    }
}

fn resolve_word(repo: &dyn Storage, sel: &str) -> Result<Word> {
    if let Ok(id) = Uuid::parse_str(sel) {
        if let Ok(w) = repo.get_word(id) {
            return Ok(w);
        }
    }
    let q = sel.trim().to_lowercase();
    repo.get_words()?
        .into_iter()
        .find(|w| w.word.to_lowercase() == q)
        .ok_or_else(|| anyhow!("word not found: {}", sel))
}

fn non_empty(s: &str, field: &str) -> Result<String> {
    let t = s.trim();
    if t.is_empty() {
        bail!("{field} cannot be empty");
    }
    Ok(t.to_string())
}

fn fmt_date(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// `None` once the input is exhausted.
fn read_line<R: BufRead>(input: &mut R, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    stdout().flush().ok();
    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s))
}
