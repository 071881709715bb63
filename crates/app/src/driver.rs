//! Line-oriented terminal frontend over `Navigator`.

use services::{Navigator, Screen};
use tokio::io::{AsyncBufReadExt, BufReader};
use trivia_core::model::Question;
use trivia_core::session::{AnswerState, QuizMachine, Selection};

/// What a line of input asks for on the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Start,
    Retry,
    Select(String),
    Next,
    PlayAgain,
    Home,
    Quit,
    Invalid(&'static str),
}

fn parse_action(screen: &Screen, line: &str) -> Action {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return Action::Quit;
    }

    match screen {
        Screen::Home { .. } => match line {
            "" | "s" | "S" => Action::Start,
            _ => Action::Invalid("press enter to start"),
        },
        Screen::Quiz(machine) => parse_quiz_action(machine, line),
        Screen::Summary(_) => match line {
            "p" | "P" | "" => Action::PlayAgain,
            "h" | "H" => Action::Home,
            _ => Action::Invalid("type p to play again or h for home"),
        },
    }
}

fn parse_quiz_action(machine: &QuizMachine, line: &str) -> Action {
    if machine.is_failed() {
        return match line {
            "r" | "R" | "" => Action::Retry,
            "h" | "H" => Action::Home,
            _ => Action::Invalid("type r to retry or h for home"),
        };
    }

    let (Some(question), Some(answer)) = (machine.current_question(), machine.answer_state())
    else {
        return Action::Invalid("still loading");
    };

    if answer.is_answered() {
        return Action::Next;
    }

    line.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| question.options().get(i))
        .map_or(Action::Invalid("pick one of the numbered options"), |option| {
            Action::Select(option.clone())
        })
}

fn render(nav: &Navigator) {
    match nav.screen() {
        Screen::Home { high_score } => {
            println!();
            println!("GameOn Trivia");
            println!("Test your knowledge of the gaming world!");
            println!("High Score: {high_score}");
            println!("[enter] start quiz   [q] quit");
        }
        Screen::Quiz(machine) => render_quiz(machine),
        Screen::Summary(view) => {
            println!();
            println!("High Score: {}", view.high_score);
            println!("You Scored {} / {}", view.score, view.total);
            println!("[p] play again   [h] home   [q] quit");
        }
    }
}

fn render_quiz(machine: &QuizMachine) {
    if let Some(message) = machine.failure_message() {
        println!("{message}");
        println!("[r] try again   [h] home");
        return;
    }

    let (Some(question), Some(progress), Some(answer)) = (
        machine.current_question(),
        machine.progress(),
        machine.answer_state(),
    ) else {
        println!("Loading Questions...");
        return;
    };

    match answer {
        AnswerState::Unanswered => {
            println!();
            println!("Question {}/{}", progress.position(), progress.total);
            if let Some(tag) = topic_line(question) {
                println!("{tag}");
            }
            println!("{}", question.text());
            for (i, option) in question.options().iter().enumerate() {
                println!("  {}) {option}", i + 1);
            }
        }
        AnswerState::Answered { correct, .. } => {
            if *correct {
                println!("Correct!");
            } else {
                println!("Wrong, the answer was: {}", question.correct_answer());
            }
            println!("[enter] next");
        }
    }
}

/// "Category · difficulty" header, when the provider filled either in.
fn topic_line(question: &Question) -> Option<String> {
    let parts: Vec<&str> = [question.category(), question.difficulty()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" · "))
}

/// Read commands from stdin until the player quits or input ends.
///
/// # Errors
///
/// Returns an I/O error if stdin cannot be read.
pub async fn run(mut nav: Navigator) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        render(&nav);
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };

        match parse_action(nav.screen(), &line) {
            Action::Quit => return Ok(()),
            Action::Start => {
                println!("Loading Questions...");
                nav.start_quiz().await;
            }
            Action::PlayAgain => {
                println!("Loading Questions...");
                nav.play_again().await;
            }
            Action::Retry => {
                println!("Loading Questions...");
                nav.retry().await;
            }
            Action::Select(option) => {
                if nav.select_option(&option) == Selection::Ignored {
                    tracing::debug!(option = option.as_str(), "selection ignored");
                }
            }
            Action::Next => {
                nav.advance().await;
            }
            Action::Home => nav.go_home().await,
            Action::Invalid(hint) => println!("{hint}"),
        }
    }
}
