//! usersctl - line-oriented front-end for a `/users` REST collection.
//!
//! Reads the base URL from `USERS_API_URL` (default `http://localhost:8000`).
//! Type `help` for commands.

use std::error::Error;
use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;
use user_records::{App, ClientConfig, DeleteOutcome, HttpBackend, SubmitOutcome};

const HELP: &str = "\
commands:
  list                  reload users from the server
  search [text]         filter by name or profession (empty clears)
  add                   open the form for a new user
  edit <row>            open the form on a row
  set <field> <value>   set name, age or profession on the open form
  submit                save the open form
  cancel                close the form without saving
  delete <row>          delete a row (asks first)
  quit";

fn read_line(stdin: &io::Stdin) -> io::Result<Option<String>> {
    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn ask(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();
    matches!(read_line(&io::stdin()), Ok(Some(answer)) if answer.trim().eq_ignore_ascii_case("y"))
}

fn parse_row(arg: &str) -> Option<usize> {
    arg.trim().parse().ok()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("user_records=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    let backend = HttpBackend::new(config)?;
    let mut app = App::new(backend);
    app.mount().await;
    println!("{}", app.render());

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = read_line(&stdin)? else {
            break;
        };
        let (command, rest) = match line.trim_start().split_once(' ') {
            Some((command, rest)) => (command, rest),
            None => (line.trim(), ""),
        };

        match command {
            "" => continue,
            "help" => {
                println!("{}", HELP);
                continue;
            }
            "quit" | "exit" => break,
            "list" => {
                app.mount().await;
            }
            "search" => {
                app.search(rest);
            }
            "add" => app.add_record(),
            "edit" => match parse_row(rest) {
                Some(row) if app.edit_row(row) => {}
                _ => println!("no such row: {}", rest.trim()),
            },
            "set" => {
                let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
                if let Err(err) = app.set_field(field.trim(), value) {
                    println!("{}", err);
                }
            }
            "submit" => match app.submit().await {
                Ok(SubmitOutcome::Success) => {}
                Ok(SubmitOutcome::Failure(err)) => println!("not saved: {}", err),
                Err(err) => println!("{}", err),
            },
            "cancel" => app.cancel(),
            "delete" => match parse_row(rest) {
                Some(row) => match app.delete_row(row, &ask).await {
                    DeleteOutcome::Deleted | DeleteOutcome::Declined => {}
                    DeleteOutcome::NoSuchRow(row) => println!("no such row: {}", row),
                    DeleteOutcome::NotPersisted(row) => println!("row {} is not saved yet", row),
                    DeleteOutcome::DeletedNotRefreshed => {
                        println!("deleted, but the list could not be reloaded (try `list`)")
                    }
                    DeleteOutcome::Failed => println!("delete failed"),
                },
                None => println!("usage: delete <row>"),
            },
            other => {
                println!("unknown command: {} (try `help`)", other);
                continue;
            }
        }
        println!("{}", app.render());
    }
    Ok(())
}
