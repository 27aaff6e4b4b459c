//! Interactive play loop.
//!
//! Reads one command per line from stdin while a background task renders the
//! session's events. Answers are typed as a label (`b`, `cat`) or a choice
//! number (`1`..`3`).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{info, warn};

use client_bootstrap::ClientBuilder;
use game_core::{Cue, FeedbackScript, GameKind, Round, SessionError, SessionId};
use runtime::{Event, RuntimeError, SessionEvent, SessionHandle, Topic};

const PRINTER_GRACE: Duration = Duration::from_secs(1);

/// Play one mini-game
#[derive(Parser, Debug)]
pub struct Play {
    /// letters, rhymes, stories, dance or flashcards
    pub game: GameKind,

    /// No tones or speech
    #[arg(long)]
    pub mute: bool,
}

impl Play {
    pub async fn execute(self, builder: ClientBuilder) -> Result<()> {
        let setup = builder.build()?;
        let mut arcade = setup.arcade;

        // App load also brings the offline cache up to date.
        let cache = Arc::new(setup.cache);
        tokio::spawn(async move {
            if let Err(e) = cache.ensure_installed().await {
                warn!("Offline cache not installed: {}", e);
            }
        });

        // Subscribe first so the opening round is not missed.
        let events = arcade.subscribe(Topic::Session);
        let session = arcade.start_session(self.game)?;
        let printer = tokio::spawn(print_events(events, session.id(), self.game));

        println!("{}", style(self.game.title()).bold().green());
        print_help(self.game);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match run_line(&session, line.trim()).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(RuntimeError::Session(SessionError::Destroyed)) => break,
                Err(e) => println!("{} {}", style("✗").red().bold(), e),
            }
        }

        let score = arcade.end_session(session.id()).await?;
        // The printer returns on `Ended`; a lagged receiver may have missed it.
        if tokio::time::timeout(PRINTER_GRACE, printer).await.is_err() {
            warn!("Event printer did not see the session end");
        }
        arcade.shutdown().await?;
        info!("Played {} for a score of {}", self.game, score);
        Ok(())
    }
}

/// Runs one input line. Returns `false` when the player quits.
///
/// An offered choice always wins over a command key, so the letter game can
/// still be answered with `p` or `n`.
async fn run_line(session: &SessionHandle, line: &str) -> runtime::Result<bool> {
    if line.is_empty() {
        return Ok(true);
    }
    if let Some(label) = offered_choice(session, line).await? {
        session.submit(label).await?;
        return Ok(true);
    }

    match line {
        "q" | "quit" => return Ok(false),
        "?" | "h" | "help" => print_help(session.kind()),
        "p" => session.say_prompt().await?,
        "n" => {
            session.next_card().await?;
        }
        "b" => {
            session.previous_card().await?;
        }
        "s" => session.say_card().await?,
        "d" => session.start_dancing().await?,
        "f" => session.freeze().await?,
        // Reported back as a choice that is not on screen.
        other => {
            session.submit(other).await?;
        }
    }
    Ok(true)
}

/// Maps a choice number or a case-insensitive label to an offered label.
async fn offered_choice(session: &SessionHandle, input: &str) -> runtime::Result<Option<String>> {
    let snapshot = session.snapshot().await?;
    let Some(round) = snapshot.round else {
        return Ok(None);
    };

    let by_number = input
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|i| round.choices.get(i));
    let choice = by_number.or_else(|| {
        round
            .choices
            .iter()
            .find(|choice| choice.label.eq_ignore_ascii_case(input))
    });
    Ok(choice.map(|choice| choice.label.clone()))
}

async fn print_events(mut events: broadcast::Receiver<Event>, id: SessionId, kind: GameKind) {
    loop {
        let event = match events.recv().await {
            Ok(Event::Session(event)) if event.session_id() == id => event,
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Event printer skipped {} events", skipped);
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => return,
        };

        match event {
            SessionEvent::Started { .. } => {}
            SessionEvent::RoundPresented { round, .. } => print_round(kind, &round),
            SessionEvent::Evaluated { evaluation, .. } => {
                if evaluation.is_correct() {
                    println!(
                        "{} score {}",
                        style("✓").green().bold(),
                        style(evaluation.score).bold()
                    );
                } else {
                    println!("{}", style("✗").yellow().bold());
                }
                print_speech(&evaluation.cues);
            }
            SessionEvent::DanceStarted { .. } => {
                println!("{}", style("♪ Dance! Press f to freeze.").magenta().bold());
            }
            SessionEvent::DanceFrozen { beats, .. } => {
                println!("{} after {} beats", style("FREEZE!").cyan().bold(), beats);
            }
            SessionEvent::Ended { score, .. } => {
                println!("{} final score {}", style("Bye!").green().bold(), score);
                return;
            }
        }
    }
}

fn print_round(kind: GameKind, round: &Round) {
    let glyph = |label: &str, glyph: &Option<String>| match glyph {
        Some(glyph) => format!("{} {}", glyph, label),
        None => label.to_owned(),
    };

    if kind == GameKind::Flashcards {
        println!(
            "{} {}",
            style(format!("Card {}:", round.index + 1)).dim(),
            style(glyph(&round.target.label, &round.target.glyph)).bold()
        );
    }

    if let Some(script) = FeedbackScript::for_kind(kind) {
        print_speech(&[script.prompt_cue(round)]);
    }
    let choices: Vec<String> = round
        .choices
        .iter()
        .enumerate()
        .map(|(i, choice)| format!("{}) {}", i + 1, glyph(&choice.label, &choice.glyph)))
        .collect();
    println!("  {}", choices.join("   "));
}

fn print_speech(cues: &[Cue]) {
    for cue in cues {
        if let Cue::Speak(text) = cue {
            println!("  {}", style(text).italic());
        }
    }
}

fn print_help(kind: GameKind) {
    let help = match kind {
        GameKind::Dance => "d dance · f freeze · q quit",
        GameKind::Flashcards => {
            "label or 1-3 answer · n next · b back · s say card · p prompt · q quit"
        }
        _ => "label or 1-3 answer · p repeat prompt · q quit",
    };
    println!("{}", style(help).dim());
}
