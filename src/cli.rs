//! Terminal front-end
//!
//! Reads slash commands from stdin and runs the same flows as the web views,
//! keeping the session token in a file between runs.

use crate::api::{BonusApi, HttpTransport};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::flows::{self, Dashboard, Destination};
use crate::forms::{
    AdminTargetForm, LoginForm, PasswordChangeForm, RegisterForm, TransferForm,
};
use crate::payload::BalanceAction;
use crate::qr;
use crate::session::{FileStore, SessionStore};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Backend origin, defaults to the hosted service
    #[arg(long)]
    pub backend_url: Option<String>,
    /// File holding the session token between runs
    #[arg(long, default_value = ".bonus-session")]
    pub session_file: PathBuf,
}

/// Available commands in the terminal client
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Log in, or unlock the admin commands with the reserved pair
    Login,
    /// Create an account
    Register,
    /// Show balance, grade and messages
    Balance,
    /// Send bonus points to another user
    Transfer,
    /// Show account details
    Profile,
    /// Print the username as a QR code
    Qr,
    /// Change the account password
    Password,
    Logout,
    AdminView,
    AdminBalance,
    AdminGrade,
    AdminPassword,
    Help,
    Quit,
    /// Unknown command
    Unknown(String),
    /// Error reading input
    Error(String),
}

impl Command {
    /// Message shown when the backend fails without saying why.
    pub fn fallback(&self) -> &'static str {
        match self {
            Command::Login => "Login failed. Please try again.",
            Command::Register => "Failed to register. Please try again.",
            Command::Balance => "Failed to fetch data.",
            Command::Transfer => "Transfer failed. Please try again.",
            Command::Profile | Command::Qr => "Failed to fetch user data.",
            Command::Password | Command::AdminPassword => "Failed to update password.",
            Command::AdminView => "Failed to fetch balance.",
            Command::AdminBalance => "Failed to update balance.",
            Command::AdminGrade => "Failed to update grade.",
            _ => "Something went wrong.",
        }
    }
}

/// Parse a line of input from stdin and convert it to a Command
pub fn parse_command(line: Result<Option<String>, std::io::Error>) -> Command {
    match line {
        Ok(Some(cmd)) => match cmd.trim() {
            "/login" => Command::Login,
            "/register" => Command::Register,
            "/balance" => Command::Balance,
            "/transfer" => Command::Transfer,
            "/profile" => Command::Profile,
            "/qr" => Command::Qr,
            "/password" => Command::Password,
            "/logout" => Command::Logout,
            "/admin_view" => Command::AdminView,
            "/admin_balance" => Command::AdminBalance,
            "/admin_grade" => Command::AdminGrade,
            "/admin_password" => Command::AdminPassword,
            "/help" => Command::Help,
            "/quit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        },
        // stdin closed
        Ok(None) => Command::Quit,
        Err(e) => {
            log::error!("Error reading stdin: {}", e);
            Command::Error(e.to_string())
        }
    }
}

struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    fn stdin() -> Self {
        Console {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn next_line(&mut self) -> Result<Option<String>, std::io::Error> {
        self.lines.next_line().await
    }

    async fn prompt(&mut self, label: &str) -> Result<String, ClientError> {
        print!("{}: ", label);
        let _ = std::io::stdout().flush();
        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(line.trim_end_matches('\r').to_string()),
            Ok(None) => Err(ClientError::validation("Input closed.")),
            Err(e) => Err(ClientError::validation(format!("Could not read input: {}", e))),
        }
    }

    async fn confirm(&mut self, question: &str) -> Result<bool, ClientError> {
        let answer = self.prompt(&format!("{} [y/N]", question)).await?;
        Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
    }
}

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = format!(
        "💰 Balance: {} Bonus points\n🏅 Grade: {}\n",
        dashboard.balance,
        dashboard.grade.as_deref().unwrap_or("-")
    );
    if dashboard.messages.is_empty() {
        out.push_str("No messages found.\n");
    } else {
        out.push_str("📨 Messages:\n");
        for message in &dashboard.messages {
            out.push_str(&format!("  {} ({})\n", message.content, message.when()));
        }
    }
    out
}

/// Dashboard text, or the error line a `/balance` would have shown.
pub fn dashboard_report(result: &Result<Dashboard, ClientError>) -> String {
    match result {
        Ok(dashboard) => render_dashboard(dashboard),
        Err(e) => format!("❌ {}\n", e.user_message(Command::Balance.fallback())),
    }
}

fn print_help() {
    println!("📜 Command list:");
    println!("----------------------------------------");
    println!("/login            - Log in");
    println!("/register         - Create an account");
    println!("/balance          - Show balance, grade and messages");
    println!("/transfer         - Send bonus points");
    println!("/profile          - Show account details");
    println!("/qr               - Print your username as a QR code");
    println!("/password         - Change your password");
    println!("/logout           - Forget the stored session");
    println!("/admin_view       - (admin) Show a user's balance and grade");
    println!("/admin_balance    - (admin) Add or subtract balance");
    println!("/admin_grade      - (admin) Set a user's grade");
    println!("/admin_password   - (admin) Force a user's password");
    println!("/help             - Show this help message");
    println!("/quit             - Exit");
    println!("----------------------------------------");
}

struct Shell {
    api: BonusApi<HttpTransport>,
    store: FileStore,
    console: Console,
    admin_unlocked: bool,
}

impl Shell {
    async fn execute(&mut self, command: &Command) -> Result<(), ClientError> {
        match command {
            Command::Login => self.login().await,
            Command::Register => self.register().await,
            Command::Balance => {
                let dashboard = flows::load_dashboard(&self.api, &self.store).await?;
                print!("{}", render_dashboard(&dashboard));
                Ok(())
            }
            Command::Transfer => self.transfer().await,
            Command::Profile => {
                let profile = flows::load_profile(&self.api, &self.store).await?;
                println!("Display Name: {}", profile.display_name);
                println!("Username: {}", profile.username);
                println!("Phone Number: {}", profile.phone_number);
                Ok(())
            }
            Command::Qr => {
                let profile = flows::load_profile(&self.api, &self.store).await?;
                println!("{}", qr::username_terminal(&profile.username)?);
                Ok(())
            }
            Command::Password => self.change_password().await,
            Command::Logout => {
                flows::logout(&self.store);
                self.admin_unlocked = false;
                println!("👋 Logged out.");
                Ok(())
            }
            Command::AdminView
            | Command::AdminBalance
            | Command::AdminGrade
            | Command::AdminPassword => self.admin(command).await,
            Command::Help => {
                print_help();
                Ok(())
            }
            Command::Quit => Ok(()),
            Command::Unknown(cmd) => {
                println!("❓ Unknown command: {}", cmd);
                Ok(())
            }
            Command::Error(e) => Err(ClientError::validation(e.clone())),
        }
    }

    async fn login(&mut self) -> Result<(), ClientError> {
        let form = LoginForm {
            username: self.console.prompt("Username").await?,
            password: self.console.prompt("Password").await?,
        };
        match flows::login(&self.api, &self.store, &form).await? {
            Destination::Admin => {
                self.admin_unlocked = true;
                println!("🔑 Admin commands unlocked, see /help.");
            }
            _ => {
                println!("✅ Logged in.");
                // the key is saved by now, a failed fetch is not a failed login
                let dashboard = flows::load_dashboard(&self.api, &self.store).await;
                print!("{}", dashboard_report(&dashboard));
            }
        }
        Ok(())
    }

    async fn register(&mut self) -> Result<(), ClientError> {
        let form = RegisterForm {
            display_name: self.console.prompt("Display name (optional)").await?,
            username: self.console.prompt("Username").await?,
            password: self.console.prompt("Password").await?,
            confirm_password: self.console.prompt("Confirm password").await?,
            phone_number: self.console.prompt("Phone number").await?,
        };
        let account = form.validate()?;
        println!("⚠️  By proceeding, you acknowledge that:");
        println!("   - You cannot change your data after signing up.");
        println!("   - You cannot recover your password if you forget it.");
        if !self.console.confirm("Create the account?").await? {
            println!("Cancelled.");
            return Ok(());
        }
        flows::register(&self.api, &account).await?;
        println!("✅ Registration successful! Use /login to sign in.");
        Ok(())
    }

    async fn transfer(&mut self) -> Result<(), ClientError> {
        // nothing is worth asking for without a session
        if self.store_is_empty() {
            return Err(ClientError::NoSession);
        }
        let form = TransferForm {
            recipient: self.console.prompt("Recipient username or phone number").await?,
            amount: self.console.prompt("Amount").await?,
        };
        let order = form.validate()?;
        let question = format!(
            "Transfer {} bonus to {}? This action cannot be undone.",
            order.amount(),
            order.recipient()
        );
        if !self.console.confirm(&question).await? {
            println!("Cancelled.");
            return Ok(());
        }
        let receipt = flows::send_transfer(&self.api, &self.store, &order).await?;
        println!("✅ {}", receipt.summary());
        print!("{}", dashboard_report(&receipt.refreshed));
        Ok(())
    }

    async fn change_password(&mut self) -> Result<(), ClientError> {
        let profile = flows::load_profile(&self.api, &self.store).await?;
        let form = PasswordChangeForm {
            current: self.console.prompt("Current password").await?,
            new: self.console.prompt("New password").await?,
            confirm: self.console.prompt("Confirm new password").await?,
        };
        let change = form.validate()?;
        let message = flows::change_password(&self.api, &profile.username, &change).await?;
        println!("✅ {}", message);
        Ok(())
    }

    async fn admin(&mut self, command: &Command) -> Result<(), ClientError> {
        if !self.admin_unlocked {
            return Err(ClientError::validation(
                "Log in with the admin credentials first.",
            ));
        }
        let target = AdminTargetForm {
            master_key: self.console.prompt("Master key").await?,
            username: self.console.prompt("Username").await?,
            phone_number: self.console.prompt("Phone number").await?,
        };
        match command {
            Command::AdminView => {
                let checked = target.validate()?;
                let standing = flows::admin_view_balance(&self.api, &checked).await?;
                println!("💰 Balance: {}", standing.account_balance);
                println!("🏅 Grade: {}", standing.grade.as_deref().unwrap_or("-"));
            }
            Command::AdminBalance => {
                let action = self
                    .console
                    .prompt("Action (add/subtract)")
                    .await?
                    .parse::<BalanceAction>()
                    .map_err(ClientError::Validation)?;
                let amount = self.console.prompt("Amount").await?;
                let (checked, amount) = target.validate_balance_update(&amount)?;
                let balance = flows::admin_update_balance(&self.api, &checked, amount, action).await?;
                println!("✅ Balance updated successfully. New balance: {}", balance);
            }
            Command::AdminGrade => {
                let grade = self.console.prompt("New grade").await?;
                let (checked, grade) = target.validate_grade_update(&grade)?;
                let recorded = flows::admin_update_grade(&self.api, &checked, &grade).await?;
                println!("✅ Grade updated successfully: {}", recorded);
            }
            Command::AdminPassword => {
                let password = self.console.prompt("New password").await?;
                let (checked, password) = target.validate_password_reset(&password)?;
                let message = flows::admin_force_password(&self.api, &checked, &password).await?;
                println!("✅ {}", message);
            }
            _ => {}
        }
        Ok(())
    }

    fn store_is_empty(&self) -> bool {
        self.store.load().is_none()
    }
}

pub async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args
        .backend_url
        .as_deref()
        .map(ClientConfig::new)
        .unwrap_or_else(ClientConfig::from_build_env);

    log::info!(
        "Welcome to bonus points, write /help to get the command list (backend: {})",
        config.backend_url()
    );

    let mut shell = Shell {
        api: BonusApi::http(config),
        store: FileStore::new(args.session_file),
        console: Console::stdin(),
        admin_unlocked: false,
    };

    match flows::resume_session(&shell.api, &shell.store).await {
        Ok(Some(_)) => println!("🔓 Session restored, try /balance."),
        Ok(None) => println!("Not logged in, use /login or /register."),
        Err(e) => log::warn!("Could not check stored session: {}", e),
    }

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = shell.console.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let command = parse_command(line);
        if command == Command::Quit {
            break;
        }
        if let Err(e) = shell.execute(&command).await {
            log::debug!("{:?} failed: {}", command, e);
            println!("❌ {}", e.user_message(command.fallback()));
        }
    }

    log::info!("👋 Bye !");
    Ok(())
}
