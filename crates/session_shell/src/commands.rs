#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    WhoAmI,
    Login {
        username: String,
        password: String,
    },
    Logout,
    Register {
        username: String,
        password: String,
        email: Option<String>,
        phone: Option<String>,
    },
    Status,
    Help,
    Quit,
    Usage(&'static str),
    Unknown(String),
}

pub const LOGIN_USAGE: &str = "login <username> <password>";
pub const REGISTER_USAGE: &str = "register <username> <password> [email] [phone]";

pub const HELP_TEXT: &str = "\
commands:
  whoami                                     ask the authority who is signed in
  login <username> <password>                sign in
  logout                                     sign out
  register <username> <password> [email] [phone]
                                             create an account
  status                                     show local session state
  help                                       show this help
  quit                                       exit";

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(input: &str) -> Option<ShellCommand> {
    let mut words = input.split_whitespace();
    let command = words.next()?;
    let args: Vec<&str> = words.collect();

    let parsed = match (command, args.as_slice()) {
        ("whoami", []) => ShellCommand::WhoAmI,
        ("login", [username, password]) => ShellCommand::Login {
            username: (*username).to_string(),
            password: (*password).to_string(),
        },
        ("login", _) => ShellCommand::Usage(LOGIN_USAGE),
        ("logout", []) => ShellCommand::Logout,
        ("register", [username, password, rest @ ..]) if rest.len() <= 2 => {
            ShellCommand::Register {
                username: (*username).to_string(),
                password: (*password).to_string(),
                email: rest.first().map(|email| (*email).to_string()),
                phone: rest.get(1).map(|phone| (*phone).to_string()),
            }
        }
        ("register", _) => ShellCommand::Usage(REGISTER_USAGE),
        ("status", []) => ShellCommand::Status,
        ("help", _) => ShellCommand::Help,
        ("quit" | "exit", []) => ShellCommand::Quit,
        _ => ShellCommand::Unknown(command.to_string()),
    };

    Some(parsed)
}
