//! Console channel — reads commands from stdin, prints replies to stdout.
//!
//! Drives the whole flow interactively: pick a difficulty, generate a
//! course, walk its lessons, mark them complete, ask the tutor. Runs until
//! the `shutdown` token is cancelled (Ctrl-C) or stdin is closed.

use std::str::FromStr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::course::{Course, Difficulty, LessonRef};
use crate::error::AppError;
use crate::llm::Role;
use crate::service::LearnService;
use crate::session::SessionState;

// ── Commands ─────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// `level <beginner|intermediate|advanced>`
    Level(Difficulty),
    /// `new <topic>` — generate a course at the current difficulty.
    New(String),
    Outline,
    /// `open <module> <lesson>` — 1-based.
    Open(LessonRef),
    Next,
    Done,
    /// `ask <question>` — tutor question scoped to the current lesson.
    Ask(String),
    Help,
    Quit,
}

fn parse_command(input: &str) -> Result<Command, String> {
    let (word, rest) = match input.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (input, ""),
    };
    match word {
        "level" => Difficulty::from_str(rest).map(Command::Level),
        "new" => {
            if rest.is_empty() {
                Err("usage: new <topic>".into())
            } else {
                Ok(Command::New(rest.to_string()))
            }
        }
        "outline" => Ok(Command::Outline),
        "open" => {
            let mut nums = rest.split_whitespace().map(|n| n.parse::<usize>());
            match (nums.next(), nums.next()) {
                (Some(Ok(m)), Some(Ok(l))) => Ok(Command::Open(LessonRef::new(m, l))),
                _ => Err("usage: open <module> <lesson>".into()),
            }
        }
        "next" => Ok(Command::Next),
        "done" => Ok(Command::Done),
        "ask" => {
            if rest.is_empty() {
                Err("usage: ask <question>".into())
            } else {
                Ok(Command::Ask(rest.to_string()))
            }
        }
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command: '{other}' (try 'help')")),
    }
}

const HELP: &str = "\
  level <difficulty>    set difficulty (beginner, intermediate, advanced)
  new <topic>           generate a course on <topic>
  outline               show the course outline and progress
  open <m> <l>          open lesson <l> of module <m>
  next                  open the next lesson
  done                  mark the current lesson complete
  ask <question>        ask the tutor about the current lesson
  quit                  exit";

// ── Run loop ─────────────────────────────────────────────────────────────────

pub async fn run(
    service: Arc<LearnService>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    info!("console channel started — type 'help' for commands. Ctrl-C to quit.");
    println!("─────────────────────────────────");
    println!(" learnlevel console  (Ctrl-C to quit)");
    println!("─────────────────────────────────");

    let mut difficulty = Difficulty::Beginner;
    let mut course: Option<Course> = None;
    let mut session = SessionState::new();

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("> ");
        use std::io::Write as _;
        let _ = std::io::stdout().flush();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!("\n[console] shutdown signal received — closing");
                info!("console channel shutting down");
                break;
            }

            line = lines.next_line() => {
                match line {
                    Err(e) => {
                        warn!("console read error: {e}");
                        break;
                    }
                    Ok(None) => {
                        info!("console stdin closed");
                        break;
                    }
                    Ok(Some(input)) => {
                        let input = input.trim().to_string();
                        if input.is_empty() { continue; }
                        debug!(input = %input, "console received line");

                        let command = match parse_command(&input) {
                            Ok(c) => c,
                            Err(msg) => { println!("{msg}"); continue; }
                        };
                        if matches!(command, Command::Quit) {
                            break;
                        }
                        handle_command(command, &service, &mut difficulty, &mut course, &mut session).await;
                    }
                }
            }
        }
    }

    Ok(())
}

async fn handle_command(
    command: Command,
    service: &LearnService,
    difficulty: &mut Difficulty,
    course: &mut Option<Course>,
    session: &mut SessionState,
) {
    match command {
        Command::Help => println!("{HELP}"),
        // Quit is intercepted by the run loop before dispatch.
        Command::Quit => {}
        Command::Level(level) => {
            *difficulty = level;
            println!("difficulty set to {level}");
        }
        Command::New(topic) => {
            println!("generating course on '{topic}' ({difficulty})…");
            let generated = service.generate_course(&topic, *difficulty, "").await;
            session.reset();
            print_outline(&generated, session);
            *course = Some(generated);
        }
        Command::Outline => match course {
            Some(c) => print_outline(c, session),
            None => println!("no course yet — use 'new <topic>'"),
        },
        Command::Open(at) => match course {
            Some(c) => {
                if session.select(c, at) {
                    print_lesson(c, session.cursor());
                } else {
                    println!("no lesson {at}");
                }
            }
            None => println!("no course yet — use 'new <topic>'"),
        },
        Command::Next => match course {
            Some(c) => match session.advance(c) {
                Some(at) => print_lesson(c, at),
                None => println!("end of course"),
            },
            None => println!("no course yet — use 'new <topic>'"),
        },
        Command::Done => match course {
            Some(c) => {
                let at = session.cursor();
                session.mark_complete(at);
                println!(
                    "lesson {at} marked complete — {}% of the course done",
                    session.progress_percent(c)
                );
            }
            None => println!("no course yet — use 'new <topic>'"),
        },
        Command::Ask(question) => match course {
            Some(c) => {
                let context = c
                    .lesson(session.cursor())
                    .map(|l| l.content.clone())
                    .unwrap_or_default();
                session.transcript_append(Role::User, &question);
                let reply = service
                    .ask_tutor(&question, &context, session.transcript())
                    .await;
                println!("{reply}");
                session.transcript_append(Role::Assistant, reply);
            }
            None => println!("no course yet — use 'new <topic>'"),
        },
    }
}

fn print_outline(course: &Course, session: &SessionState) {
    println!("{} ({})", course.title, course.difficulty);
    println!(
        "{} modules · {} lessons · {}% complete",
        course.modules.len(),
        course.total_lessons(),
        session.progress_percent(course)
    );
    for (i, module) in course.modules.iter().enumerate() {
        println!("{}. {} — {}", i + 1, module.title, module.description);
        for (j, lesson) in module.lessons.iter().enumerate() {
            let at = LessonRef::new(i + 1, j + 1);
            let mark = if session.is_complete(at) { "✓" } else { " " };
            println!("   {mark} {at} {}", lesson.title);
        }
    }
}

fn print_lesson(course: &Course, at: LessonRef) {
    if let Some(lesson) = course.lesson(at) {
        println!("── {at} {} ──", lesson.title);
        println!("{}", lesson.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level() {
        assert_eq!(
            parse_command("level advanced").unwrap(),
            Command::Level(Difficulty::Advanced)
        );
        assert!(parse_command("level expert").is_err());
    }

    #[test]
    fn parse_new_requires_topic() {
        assert_eq!(
            parse_command("new Rust ownership").unwrap(),
            Command::New("Rust ownership".into())
        );
        assert!(parse_command("new").is_err());
    }

    #[test]
    fn parse_open_requires_two_indices() {
        assert_eq!(
            parse_command("open 2 3").unwrap(),
            Command::Open(LessonRef::new(2, 3))
        );
        assert!(parse_command("open 2").is_err());
        assert!(parse_command("open a b").is_err());
    }

    #[test]
    fn parse_ask_keeps_question_verbatim() {
        assert_eq!(
            parse_command("ask why is the sky blue?").unwrap(),
            Command::Ask("why is the sky blue?".into())
        );
    }

    #[test]
    fn parse_bare_commands() {
        assert_eq!(parse_command("outline").unwrap(), Command::Outline);
        assert_eq!(parse_command("next").unwrap(), Command::Next);
        assert_eq!(parse_command("done").unwrap(), Command::Done);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn parse_unknown_command_errors() {
        assert!(parse_command("frobnicate").is_err());
    }
}
