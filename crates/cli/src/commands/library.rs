use anyhow::Context;
use cowriter::CoWriter;
use pipeline::NoteUpdate;

use super::{print_setup_notice, short_date};
use crate::cli::{ArticleCommands, NoteCommands, SeedCommands};

pub async fn seed(action: SeedCommands, writer: &mut CoWriter) -> anyhow::Result<()> {
    match action {
        SeedCommands::Add(args) => {
            let seed = writer
                .capture_seed(&args.title, &args.content, args.pillar)
                .await
                .context("could not capture seed")?;
            println!("Captured {} [{}] {}", seed.id, seed.pillar, seed.title);
        }
        SeedCommands::List => {
            let seeds = writer.refresh_seeds().await.context("could not load seeds")?;
            if seeds.is_empty() {
                println!("No seeds yet. Capture one with `storyseed seed add`.");
            }
            for seed in seeds {
                println!(
                    "{}  {}  {:<15} {:<10} {}",
                    seed.id,
                    short_date(seed.created_at),
                    seed.pillar.label(),
                    seed.status.to_string(),
                    seed.title
                );
            }
        }
    }
    Ok(())
}

pub async fn note(action: NoteCommands, writer: &mut CoWriter) -> anyhow::Result<()> {
    match action {
        NoteCommands::Add(args) => {
            let note = writer
                .add_note(&args.title, &args.content, args.kind, args.tags)
                .await
                .context("could not add note")?;
            println!("Added {} ({}) {}", note.id, note.kind, note.title);
        }
        NoteCommands::List => {
            let notes = writer.notes().await.context("could not load notes")?;
            for note in notes {
                let tags = if note.tags.is_empty() {
                    String::new()
                } else {
                    format!("  #{}", note.tags.join(" #"))
                };
                println!("{}  {:<9} {}{tags}", note.id, note.kind.to_string(), note.title);
            }
        }
        NoteCommands::Edit(args) => {
            let update = NoteUpdate {
                title: args.title,
                content: args.content,
                kind: args.kind,
                tags: args.tags,
            };
            let note = writer
                .update_note(args.id, update)
                .await
                .context("could not update note")?;
            println!("Updated {} ({}) {}", note.id, note.kind, note.title);
        }
        NoteCommands::Rm { id } => {
            writer.delete_note(id).await.context("could not delete note")?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

pub async fn article(action: ArticleCommands, writer: &mut CoWriter) -> anyhow::Result<()> {
    let articles = writer.articles().await.context("could not load articles")?;
    match action {
        ArticleCommands::List => {
            if articles.is_empty() {
                println!("No saved articles yet. Start one with `storyseed write`.");
            }
            for article in &articles {
                println!(
                    "{}  {}  {:<15} {}",
                    article.id,
                    short_date(article.created_at),
                    article.pillar.label(),
                    article.title
                );
            }
        }
        ArticleCommands::Show { id } => {
            let article = articles
                .into_iter()
                .find(|a| a.id == id)
                .with_context(|| format!("article {id} not found"))?;
            println!("{}\n[{}] {}\n", article.title, article.pillar, short_date(article.created_at));
            println!("{}\n", article.content);
            for question in &article.questions {
                let answer = article.answers.get(question).map_or("", String::as_str);
                println!("Q: {question}\nA: {answer}\n");
            }
        }
    }
    Ok(())
}

pub async fn stats(writer: &mut CoWriter) -> anyhow::Result<()> {
    writer.refresh_seeds().await.context("could not load seeds")?;
    let stats = writer.dashboard();
    println!("Total seeds:      {}", stats.total_seeds);
    println!("This week:        {}", stats.captured_this_week);
    println!("Ready to write:   {}", stats.ready_to_write);
    Ok(())
}

pub fn status(writer: &CoWriter) {
    match writer.user() {
        Some(user) => println!("Signed in as {} ({})", user.display_name, user.id),
        None => println!("Not signed in. Set user.id in the config or STORYSEED_USER_ID."),
    }
    if writer.setup_notice().is_none() {
        println!("AI provider and cloud storage are configured.");
    } else {
        print_setup_notice(writer);
    }
}
