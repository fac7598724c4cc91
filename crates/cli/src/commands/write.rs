//! The interactive seed-to-draft flow.
//!
//! Reads answers line by line from stdin. End of input quits at any prompt;
//! quitting discards the session without saving.

use std::io::Write as _;

use anyhow::Context;
use cowriter::CoWriter;
use pipeline::{Seed, SeedId, Stage, StorySeedError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use super::print_setup_notice;
use crate::cli::WriteArgs;

pub async fn run(args: WriteArgs, writer: &mut CoWriter) -> anyhow::Result<()> {
    print_setup_notice(writer);
    let mut input = Prompter::stdin();

    let seeds = writer
        .refresh_seeds()
        .await
        .context("could not load seeds")?
        .to_vec();
    let seed_id = match args.seed {
        Some(id) => id,
        None => match pick_seed(&seeds, &mut input).await? {
            Some(id) => id,
            None => return Ok(()),
        },
    };

    writer.begin(seed_id).await.context("could not start writing")?;
    let outcome = develop(writer, &mut input).await;
    if writer.stage() != Stage::Idle {
        writer.discard().await;
        println!("Session discarded.");
    }
    outcome
}

async fn pick_seed<R>(seeds: &[Seed], input: &mut Prompter<R>) -> anyhow::Result<Option<SeedId>>
where
    R: AsyncBufRead + Unpin,
{
    if seeds.is_empty() {
        println!("No seeds yet. Capture one with `storyseed seed add`.");
        return Ok(None);
    }
    for (i, seed) in seeds.iter().enumerate() {
        println!("{:>2}. [{}] {} ({})", i + 1, seed.pillar, seed.title, seed.status);
    }
    let prompt = format!("Which seed? [1-{}], q to quit:", seeds.len());
    Ok(match input.choose(&prompt, seeds.len(), false).await? {
        Choice::Pick(i) => Some(seeds[i].id),
        Choice::Regenerate | Choice::Quit => None,
    })
}

async fn develop<R>(writer: &mut CoWriter, input: &mut Prompter<R>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    // Titles
    'titles: loop {
        let titles = match writer.generate_titles().await {
            Ok(titles) => titles.to_vec(),
            Err(err) if input.offer_retry(&err).await? => continue,
            Err(_) => return Ok(()),
        };
        println!();
        print_numbered(&titles);
        let prompt = format!("Pick a title [1-{}], r to regenerate, q to quit:", titles.len());
        match input.choose(&prompt, titles.len(), true).await? {
            Choice::Pick(i) => {
                writer.choose_title(i)?;
                break 'titles;
            }
            Choice::Regenerate => continue,
            Choice::Quit => return Ok(()),
        }
    }

    // Questions
    let questions = 'questions: loop {
        let questions = match writer.generate_questions().await {
            Ok(questions) => questions.to_vec(),
            Err(err) if input.offer_retry(&err).await? => continue,
            Err(_) => return Ok(()),
        };
        println!();
        print_numbered(&questions);
        loop {
            let Some(line) = input
                .ask("Questions to skip (e.g. 2,5), Enter to keep all, r to regenerate:")
                .await?
            else {
                return Ok(());
            };
            match line.to_ascii_lowercase().as_str() {
                "r" => continue 'questions,
                "q" => return Ok(()),
                _ => {}
            }
            match parse_indices(&line, questions.len()) {
                Ok(skip) if skip.len() == questions.len() => {
                    println!("Keep at least one question.");
                }
                Ok(skip) => {
                    for i in skip {
                        writer.set_selected(i, false)?;
                    }
                    break 'questions questions;
                }
                Err(msg) => println!("{msg}"),
            }
        }
    };

    // Answers
    for (i, question) in questions.iter().enumerate() {
        if !writer.session().is_selected(i) {
            continue;
        }
        println!("\n{question}");
        loop {
            let Some(answer) = input.ask(">").await? else {
                return Ok(());
            };
            if answer.is_empty() {
                println!("An answer is required.");
                continue;
            }
            writer.answer(i, answer)?;
            break;
        }
    }
    writer.submit_answers()?;

    // Draft
    loop {
        match writer.generate_draft().await {
            Ok(_) => {}
            Err(err) if input.offer_retry(&err).await? => continue,
            Err(_) => return Ok(()),
        }
        let session = writer.session();
        println!(
            "\n{}\n\n{}\n",
            session.chosen_title().unwrap_or_default(),
            session.draft_content()
        );

        loop {
            let Some(choice) = input.ask("[s]ave, [e]xport, [r]egenerate, [q]uit:").await? else {
                return Ok(());
            };
            match choice.to_ascii_lowercase().as_str() {
                "s" | "save" => match writer.save_article().await {
                    Ok(article) => {
                        println!("Saved article {}.", article.id);
                        return Ok(());
                    }
                    Err(err) => println!("Could not save: {err}. The draft is still here."),
                },
                "e" | "export" => match writer.export_draft().await {
                    Ok(location) => println!("Exported to {location}"),
                    Err(err) => println!("Could not export: {err}"),
                },
                "r" | "regenerate" => break,
                "q" | "quit" => return Ok(()),
                other => println!("Unknown choice '{other}'."),
            }
        }
    }
}

fn print_numbered(items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        println!("{:>2}. {item}", i + 1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    /// Zero-based index.
    Pick(usize),
    Regenerate,
    Quit,
}

/// Parses a one-based menu answer.
fn parse_choice(input: &str, count: usize, allow_regenerate: bool) -> Option<Choice> {
    match input.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" => Some(Choice::Quit),
        "r" | "regenerate" if allow_regenerate => Some(Choice::Regenerate),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=count).contains(n))
            .map(|n| Choice::Pick(n - 1)),
    }
}

/// Parses a comma- or space-separated list of one-based indices into sorted,
/// de-duplicated zero-based ones. Blank input is an empty list.
fn parse_indices(input: &str, count: usize) -> Result<Vec<usize>, String> {
    let mut indices = Vec::new();
    for token in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        match token.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => indices.push(n - 1),
            _ => return Err(format!("'{token}' is not a number between 1 and {count}.")),
        }
    }
    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}

struct Prompter<R> {
    lines: Lines<R>,
}

impl Prompter<BufReader<Stdin>> {
    fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Prints `label` and reads one trimmed line; `None` at end of input.
    async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        print!("{label} ");
        std::io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await
            .context("could not read from stdin")?
            .map(|line| line.trim().to_string()))
    }

    /// Asks until the answer is a valid menu choice. End of input quits.
    async fn choose(
        &mut self,
        label: &str,
        count: usize,
        allow_regenerate: bool,
    ) -> anyhow::Result<Choice> {
        loop {
            let Some(line) = self.ask(label).await? else {
                return Ok(Choice::Quit);
            };
            match parse_choice(&line, count, allow_regenerate) {
                Some(choice) => return Ok(choice),
                None => println!("Please enter a number between 1 and {count}."),
            }
        }
    }

    /// Reports a failed generation step and asks whether to try again.
    async fn offer_retry(&mut self, err: &StorySeedError) -> anyhow::Result<bool> {
        if let StorySeedError::SetupRequired { message } = err {
            println!("Setup required: {message}");
            return Ok(false);
        }
        println!("Generation failed: {err}");
        let answer = self.ask("Try again? [Y/n]").await?;
        Ok(matches!(answer.as_deref(), Some("" | "y" | "Y" | "yes")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn menu_choices_are_one_based() {
        assert_eq!(parse_choice("2", 3, true), Some(Choice::Pick(1)));
        assert_eq!(parse_choice(" Q ", 3, true), Some(Choice::Quit));
        assert_eq!(parse_choice("r", 3, true), Some(Choice::Regenerate));
        assert_eq!(parse_choice("r", 3, false), None);
        assert_eq!(parse_choice("0", 3, true), None);
        assert_eq!(parse_choice("4", 3, true), None);
    }

    #[test]
    fn skip_lists_accept_commas_and_spaces() {
        assert_eq!(parse_indices("", 5), Ok(vec![]));
        assert_eq!(parse_indices("5, 2 2", 5), Ok(vec![1, 4]));
        assert!(parse_indices("6", 5).is_err());
        assert!(parse_indices("two", 5).is_err());
    }

    #[tokio::test]
    async fn prompter_reads_trimmed_lines_until_eof() {
        let mut input = Prompter::new(&b"  first  \n9\n2\n"[..]);
        assert_eq!(input.ask(">").await.unwrap().as_deref(), Some("first"));
        assert_eq!(input.choose(">", 3, false).await.unwrap(), Choice::Pick(1));
        assert_eq!(input.ask(">").await.unwrap(), None);
    }

    #[tokio::test]
    async fn setup_errors_are_not_retried() {
        let mut input = Prompter::new(&b"y\n"[..]);
        let err = StorySeedError::SetupRequired {
            message: "no key".into(),
        };
        assert!(!input.offer_retry(&err).await.unwrap());
        assert_eq!(input.ask(">").await.unwrap().as_deref(), Some("y"));
    }
}
