//! GrainDB - CLI Client

use std::io::{self, Write};

use graindb::Database;

/// Print welcome banner
fn print_banner(name: &str) {
    println!(
        r#"
GrainDB - a simple SQL database engine in Rust
Database: {}
Type '.help' for help, 'exit' to quit
"#,
        name
    );
}

/// Print help message
fn print_help() {
    println!(
        r#"
Commands:
  .help              Show this help message
  .tables            List all tables
  .quit              Exit GrainDB

SQL Commands:
  CREATE TABLE ...   Create a new table
  DROP TABLE ...     Drop a table
  INSERT INTO ...    Insert a row
  SELECT ...         Query data
  UPDATE ...         Update rows
  DELETE FROM ...    Delete rows

Examples:
  CREATE TABLE users (id INT PRIMARY KEY AUTO_INCREMENT, name VARCHAR)
  INSERT INTO users (name) VALUES ('Alice')
  SELECT * FROM users WHERE id = 1
"#
    );
}

/// Handle special dot commands
fn handle_special_command(cmd: &str, db: &Database) {
    match cmd {
        ".help" => print_help(),
        ".quit" | ".exit" => {
            println!("Goodbye!");
            std::process::exit(0);
        }
        ".tables" => {
            let tables = db.all_tables();
            if tables.is_empty() {
                println!("No tables found.");
            } else {
                println!("Tables:");
                let mut names: Vec<&String> = tables.keys().collect();
                names.sort();
                for name in names {
                    println!("  {}", name);
                }
            }
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Type '.help' for available commands.");
        }
    }
}

/// Main REPL loop
fn run_repl(db: &Database) {
    print_banner(db.name());

    loop {
        print!("sql> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                continue;
            }
        }

        let sql = line.trim();
        if sql.is_empty() {
            continue;
        }
        if sql == "exit" {
            break;
        }
        if sql.starts_with('.') {
            handle_special_command(sql, db);
            continue;
        }

        match db.execute(sql) {
            Ok(result) => println!("{}", result),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    println!("\nGoodbye!");
}

fn main() {
    let name = std::env::args().nth(1).unwrap_or_else(|| "graindb".to_string());
    let db = match Database::open(&name) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database {}: {}", name, e);
            std::process::exit(1);
        }
    };
    run_repl(&db);
}
