#![allow(dead_code)]

use std::io::{self, Write};

use anyhow::Context;
use scholarprep_engine::models::exam::ExamSpec;
use scholarprep_engine::models::session::{QuizSession, SessionOptions};
use scholarprep_engine::models::timer::TimerEvent;
use scholarprep_engine::services::aggregator::ResultAggregator;
use scholarprep_engine::services::composer::ExamComposer;
use scholarprep_engine::utils::time::{format_mm_ss, format_time_taken};
use scholarprep_engine::{AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scholarprep_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ScholarPrep quiz engine");

    let config = Config::load().context("Failed to load configuration")?;
    let state = AppState::new(config).await?;

    let (practice_subject, review) = parse_args();

    if let Some(subject) = practice_subject.as_deref() {
        if !state.repository.subjects().iter().any(|s| s == subject) {
            println!("No questions available for subject {subject:?}. Known subjects:");
            for known in state.repository.subjects() {
                println!("  - {known}");
            }
            return Ok(());
        }
    }

    let language = state.history.load_language()?.unwrap_or_default();

    let mut rng = rand::rng();
    let questions = match practice_subject.as_deref() {
        Some(subject) => ExamComposer::compose_practice(
            &state.repository,
            subject,
            state.config.practice_limit,
            &mut rng,
        )?,
        None => ExamComposer::compose(
            &state.repository,
            &ExamSpec::scholarship_exam(),
            None,
            &mut rng,
        )?,
    };

    let mut options = if review {
        SessionOptions::review()
    } else {
        SessionOptions::default()
    };
    options.time_limit_seconds = state.config.exam_time_limit_seconds;

    let mut session = QuizSession::new(questions, options, language)?;
    let aggregator = ResultAggregator::new(state.config.pass_mark);

    println!();
    println!(
        "ScholarPrep {} — {} questions. Good luck!",
        if review { "review" } else { "mock exam" },
        session.total()
    );

    let mut input = String::new();
    while !session.is_finished() {
        let tick = match session.tick() {
            TimerEvent::TimeExpired(_) => {
                println!();
                println!("Time is up. Session abandoned; nothing was recorded.");
                return Ok(());
            }
            TimerEvent::TimerTick(tick) => tick,
        };

        let view = session.view()?;
        println!();
        println!(
            "[{}] Q{}/{} — {} (chapter {})",
            format_mm_ss(tick.elapsed_seconds),
            view.index + 1,
            view.total,
            view.subject,
            view.chapter
        );
        println!("{}", view.prompt);
        if let Some(image) = &view.image {
            println!("(see image: {image})");
        }
        for (i, option) in view.options.iter().enumerate() {
            println!("  {}. {}", OPTION_LETTERS[i], option);
        }
        print!("answer [A-D], (l)anguage, (r)eveal, (n)ext, (q)uit > ");
        io::stdout().flush()?;

        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            println!();
            println!("Input closed. Session abandoned; nothing was recorded.");
            return Ok(());
        }

        match input.trim().to_lowercase().as_str() {
            "q" => {
                println!("Session abandoned; nothing was recorded.");
                return Ok(());
            }
            "l" => {
                let language = session.language().toggle();
                session.set_language(language);
                state.history.save_language(language)?;
            }
            "r" => match session.reveal_current() {
                Ok(correct) => println!("Correct answer: {correct}"),
                Err(err) => println!("{err}"),
            },
            "n" => {
                if let Err(err) = session.advance() {
                    println!("{err}");
                }
            }
            letter @ ("a" | "b" | "c" | "d") => {
                let index = (letter.as_bytes()[0] - b'a') as usize;
                let selected = view.options[index].clone();
                match session.answer_current(&selected) {
                    Ok(true) => println!("Correct!"),
                    Ok(false) => {
                        let correct = session.reveal_current()?;
                        println!("Wrong. Correct answer: {correct}");
                    }
                    Err(err) => println!("{err}"),
                }
            }
            _ => println!("Unrecognized input"),
        }
    }

    let record = aggregator.summarize(&session)?;
    let sheet = session.answer_sheet()?;

    println!();
    println!("=== Results ===");
    println!(
        "Score: {}/{} ({}%) — {}",
        record.score,
        record.total,
        record.percentage,
        if record.passed { "PASS" } else { "FAIL" }
    );
    println!(
        "Time taken: {}",
        format_time_taken(session.elapsed().num_milliseconds())
    );

    println!();
    println!("Subject breakdown:");
    for tally in &record.per_subject {
        println!("  {}: {}/{}", tally.subject, tally.correct, tally.total());
    }

    println!();
    println!("Answer sheet:");
    for row in &sheet {
        let mark = match row.is_correct {
            Some(true) => "+",
            Some(false) => "x",
            None => "-",
        };
        println!("  {} {}. {}", mark, row.index + 1, row.prompt);
    }

    state.history.append(&record)?;
    let stats = state.history.record_outcome(record.passed)?;
    let history = state.history.read_all()?;
    let analytics = aggregator.analyze(&history, state.config.history_limit);

    println!();
    println!(
        "=== Across your last {} exam{} ===",
        analytics.sessions_analyzed,
        if analytics.sessions_analyzed == 1 { "" } else { "s" }
    );
    println!("Average score: {}%", analytics.average_score_percent);
    println!("Strongest subject: {}", analytics.strongest_subject);
    println!("Weakest subject: {}", analytics.weakest_subject);
    println!(
        "Exams taken: {} — passed {} ({}%)",
        stats.total,
        stats.wins,
        stats.win_rate_percent()
    );

    Ok(())
}

fn parse_args() -> (Option<String>, bool) {
    let mut args = std::env::args().skip(1);
    let mut subject = None;
    let mut review = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--subject" => subject = args.next(),
            "--review" => review = true,
            other => eprintln!("Ignoring unknown argument {other:?}"),
        }
    }

    (subject, review)
}
