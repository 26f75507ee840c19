use std::error::Error;
use std::io::{self, BufRead, Write};

use clap::Args;
use sifferlek_core::milestones::{milestone, Milestone};
use sifferlek_core::stickers::{filter_by_progression, sticker};
use sifferlek_core::storage::FileMedium;
use sifferlek_core::{
    AbilityTracker, GameAction, GameConfig, GameMode, MilestoneEvaluator, ProgressStore, Question,
    QuestionKind, RoundEngine, StickerStore,
};

#[derive(Args)]
pub struct PlayArgs {
    /// Game mode: plus (addition) or rakna (counting)
    #[arg(long)]
    mode: Option<String>,
    /// Difficulty level 1-4
    #[arg(long)]
    level: Option<u8>,
    /// Fixed RNG seed for a reproducible round
    #[arg(long)]
    seed: Option<u64>,
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn Error>> {
    let config = GameConfig::load()?;
    let mode = match args.mode.as_deref() {
        Some("plus") | Some("arithmetic") => GameMode::Arithmetic,
        Some("rakna") | Some("counting") => GameMode::Counting,
        Some(other) => return Err(format!("unknown mode '{other}'").into()),
        None => config.default_mode,
    };
    let mut level = args.level.unwrap_or(config.default_level).clamp(1, 4);
    let seed = args.seed.or(config.seed);

    let mut progress = ProgressStore::new(FileMedium::open()?);
    let mut stickers = StickerStore::new(FileMedium::open()?);

    // Durable progress flows into the session once, at load.
    let stored = progress.load();
    let mut engine =
        RoundEngine::with_progress(mode, level, stored.total_score, stored.best_streak, seed);
    let mut tracker = AbilityTracker::new(level);
    let evaluator = MilestoneEvaluator::new(mode);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Välkommen till Sifferlek! (svara med en siffra, 'n' = nästa, 'q' = avsluta)");
    loop {
        render_question(engine.state().current_question(), engine.state());

        let Some(line) = next_line(&mut lines)? else {
            break;
        };
        match line.as_str() {
            "q" => break,
            "n" => {
                engine.apply(GameAction::NextQuestion);
            }
            "p" => {
                engine.apply(GameAction::PrevQuestion);
            }
            input => {
                let Ok(value) = input.parse::<u32>() else {
                    println!("  Försök igen: en siffra, 'n' eller 'q'.");
                    continue;
                };
                let previous = engine.state().clone();
                if engine.apply(GameAction::SelectAnswer { value }).is_none() {
                    // Absorbed repeat or a finished round.
                    println!("  Prova ett annat svar.");
                    continue;
                }
                let correct = engine.state().answer.is_correct() == Some(true);
                tracker.record(correct);
                if correct {
                    println!("  Rätt! +{} poäng", engine.state().score - previous.score);
                } else if engine.state().round_complete {
                    println!("  Fel. Inga hjärtan kvar.");
                } else {
                    println!("  Fel, försök igen! Hjärtan kvar: {}", engine.state().hearts);
                }

                let mut collection = stickers.load();
                if let Some(m) = evaluator.evaluate(engine.state(), &previous, &mut collection) {
                    stickers.save(&collection)?;
                    engine.set_pending_milestone(Some(m.id.to_string()));
                    offer_reward(m, &mut stickers, engine.state().effective_total_score(), &mut lines)?;
                    engine.set_pending_milestone(None);
                } else {
                    stickers.save(&collection)?;
                }

                // A wrong answer keeps the question up for another try.
                if correct && !engine.state().round_complete {
                    engine.apply(GameAction::NextQuestion);
                }
            }
        }

        if engine.state().round_complete {
            engine.apply(GameAction::ShowSummary);
            let summary = engine.summary();
            progress.record_round(&summary, engine.state())?;
            println!("\n── Rundan är klar ──");
            println!("{}", serde_json::to_string_pretty(&summary)?);

            // Finishing any round counts as today's challenge. The sticker
            // reward is once per profile, the flag once per day.
            if !progress.is_daily_challenge_complete() {
                progress.complete_daily_challenge()?;
                println!("⭐ Dagens utmaning klar!");
                let mut collection = stickers.load();
                if !collection.milestone_reached("daily_challenge") {
                    collection.mark_milestone_reached("daily_challenge");
                    stickers.save(&collection)?;
                    if let Some(m) = milestone("daily_challenge") {
                        offer_reward(
                            m,
                            &mut stickers,
                            engine.state().effective_total_score(),
                            &mut lines,
                        )?;
                    }
                }
            }

            print!("Spela en runda till? (j/n) ");
            io::stdout().flush()?;
            match next_line(&mut lines)?.as_deref() {
                Some("j") | Some("ja") => {
                    let next_level = tracker.recommended_level();
                    if next_level > level {
                        println!("Du är duktig! Nästa runda blir lite svårare.");
                    } else if next_level < level {
                        println!("Vi tar det lite lugnare nästa runda.");
                    }
                    level = next_level;
                    let previous = engine.state().clone();
                    engine.apply(GameAction::InitRound { level });
                    // Starting round 2 can itself unlock "first_round".
                    let mut collection = stickers.load();
                    if let Some(m) =
                        evaluator.evaluate(engine.state(), &previous, &mut collection)
                    {
                        stickers.save(&collection)?;
                        engine.set_pending_milestone(Some(m.id.to_string()));
                        offer_reward(
                            m,
                            &mut stickers,
                            engine.state().effective_total_score(),
                            &mut lines,
                        )?;
                        engine.set_pending_milestone(None);
                    } else {
                        stickers.save(&collection)?;
                    }
                }
                _ => break,
            }
        }
    }

    println!("Hej då!");
    Ok(())
}

fn render_question(question: Option<&Question>, state: &sifferlek_core::RoundState) {
    let Some(q) = question else {
        return;
    };
    println!(
        "\nFråga {}/{}  ❤ {}  Poäng: {}  Svit: {}",
        state.current_index + 1,
        state.questions.len(),
        state.hearts,
        state.effective_total_score(),
        state.streak,
    );
    match q.kind {
        QuestionKind::Arithmetic => println!("  {} = ?", q.prompt),
        QuestionKind::Counting => {
            let mut parts = q.prompt.split('|');
            let text = parts.next().unwrap_or_default();
            let emoji = parts.next().unwrap_or("⭐");
            println!("  {text}");
            // Objects in rows of five, easier for a child to count.
            for chunk_start in (0..q.answer).step_by(5) {
                let row_len = (q.answer - chunk_start).min(5);
                println!("  {}", emoji.repeat(row_len as usize));
            }
        }
    }
    let options: Vec<String> = q.options.iter().map(|o| o.to_string()).collect();
    println!("  Alternativ: {}", options.join("  "));
}

fn offer_reward(
    milestone: &Milestone,
    stickers: &mut StickerStore<FileMedium>,
    total_score: u32,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<(), Box<dyn Error>> {
    println!("\n🎉 {} — {}", milestone.name, milestone.description);

    let earned_count = stickers.load().earned.len();
    let mut options = filter_by_progression(
        milestone.sticker_options.iter().copied(),
        total_score,
        earned_count,
    );
    if options.is_empty() {
        // Everything gated: fall back to the full option list.
        options = milestone.sticker_options.to_vec();
    }

    println!("Välj ett klistermärke:");
    for (i, id) in options.iter().enumerate() {
        if let Some(s) = sticker(id) {
            println!("  {}: {} {}", i + 1, s.emoji, s.name);
        }
    }
    print!("Val (1-{}): ", options.len());
    io::stdout().flush()?;

    let choice = next_line(lines)?
        .and_then(|l| l.parse::<usize>().ok())
        .filter(|&n| n >= 1 && n <= options.len())
        .unwrap_or(1);
    let chosen = options[choice - 1];

    if let Some(spot) = stickers.grant_and_place(chosen)? {
        let s = sticker(chosen).map(|s| s.name).unwrap_or(chosen);
        println!("  {} placerad på tavla {} ({}, {})", s, spot.0 + 1, spot.1, spot.2);
    }
    Ok(())
}

fn next_line(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<String>, Box<dyn Error>> {
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_lowercase())),
        None => Ok(None),
    }
}
