mod terminal;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use worknest_client::controller::{
    AddTaskForm, AdminController, AdminTab, AuthController, PageContext, RegisterForm,
    UserController, UserTab,
};
use worknest_client::{ApiClient, Document, FileStorage, SessionManager, TaskFilter};
use worknest_types::TaskStatus;
use worknest_types::api::CreateUserRequest;

use terminal::TerminalHost;

/// WorkNest dashboards from the terminal.
#[derive(Debug, Parser)]
#[command(name = "worknest", version)]
struct Cli {
    /// Base URL of the REST API.
    #[arg(long, env = "WORKNEST_API_BASE", default_value = "http://localhost:8080/api")]
    api_base: String,

    /// File holding the session token and profile.
    #[arg(long, env = "WORKNEST_STORAGE_PATH", default_value = "worknest-storage.json")]
    storage: PathBuf,

    /// Answer yes to every confirmation.
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    Logout,
    /// Show the stored profile.
    Whoami,
    #[command(subcommand)]
    Admin(AdminCommand),
    #[command(subcommand)]
    User(UserCommand),
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    Stats,
    Users,
    Tasks,
    Comments,
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
    AddTask {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        assignee: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        due: String,
    },
    DeleteUser { id: i64 },
    DeleteTask { id: i64 },
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    Stats,
    Tasks {
        /// all, pending, in_progress, completed or delayed
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
    },
    Task { id: i64 },
    Status { id: i64, status: TaskStatus },
    Comment { id: i64, text: String },
}

type Page = PageContext<FileStorage, TerminalHost>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worknest=info,worknest_client=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let storage = FileStorage::open(&cli.storage)
        .with_context(|| format!("opening {}", cli.storage.display()))?;
    let ctx = PageContext::new(
        ApiClient::new(&cli.api_base),
        SessionManager::new(storage),
        TerminalHost::new(cli.yes),
    );
    info!("Using API at {}", cli.api_base);

    match cli.command {
        Command::Login { email, password } => {
            let mut auth = AuthController::new(ctx);
            let outcome = auth.login(&email, &password).await;
            print_document(&auth.ctx().document);
            let resp = outcome?;
            println!("Signed in as {} ({})", resp.user.name, resp.user.role);
            if let Some(path) = &auth.ctx().host.redirected_to {
                println!("Dashboard: {}", path);
            }
        }
        Command::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let mut auth = AuthController::new(ctx);
            let form = RegisterForm {
                name,
                email,
                password,
                confirm_password,
            };
            let outcome = auth.register(&form).await;
            print_document(&auth.ctx().document);
            if outcome?.is_none() {
                bail!("registration rejected");
            }
        }
        Command::Logout => {
            let mut ctx = ctx;
            ctx.logout()?;
            println!("Signed out");
        }
        Command::Whoami => {
            let profile = ctx.session.current_user();
            match (profile.name, profile.role) {
                (Some(name), Some(role)) => println!("{} ({})", name, role),
                (Some(name), None) => println!("{}", name),
                _ => println!("Not signed in"),
            }
        }
        Command::Admin(cmd) => run_admin(ctx, cmd).await?,
        Command::User(cmd) => run_user(ctx, cmd).await?,
    }

    Ok(())
}

async fn run_admin(ctx: Page, cmd: AdminCommand) -> anyhow::Result<()> {
    let mut admin = AdminController::new(ctx);
    if !admin.init().await {
        bail!("admin access required; sign in with `worknest login`");
    }

    let outcome = match cmd {
        AdminCommand::Stats => Ok(()),
        AdminCommand::Users => admin.activate(AdminTab::Users).await,
        AdminCommand::Tasks => admin.activate(AdminTab::Tasks).await,
        AdminCommand::Comments => admin.activate(AdminTab::Comments).await,
        AdminCommand::AddUser {
            name,
            email,
            password,
            role,
        } => {
            admin.open_add_user_modal();
            let mut form = CreateUserRequest {
                name,
                email,
                password,
                role,
            };
            admin.add_user(&mut form).await
        }
        AdminCommand::AddTask {
            title,
            description,
            assignee,
            start,
            due,
        } => {
            admin.open_add_task_modal();
            let mut form = AddTaskForm {
                title,
                description,
                assigned_user_id: assignee,
                start_date: start,
                due_date: due,
            };
            admin.add_task(&mut form).await
        }
        AdminCommand::DeleteUser { id } => admin.delete_user(id).await.map(drop),
        AdminCommand::DeleteTask { id } => admin.delete_task(id).await.map(drop),
    };

    print_document(&admin.ctx().document);
    outcome?;
    Ok(())
}

async fn run_user(ctx: Page, cmd: UserCommand) -> anyhow::Result<()> {
    let mut user = UserController::new(ctx);
    if !user.init().await {
        bail!("not signed in; use `worknest login`");
    }

    let outcome = match cmd {
        UserCommand::Stats => Ok(()),
        UserCommand::Tasks { filter } => {
            if filter == TaskFilter::All {
                user.activate(UserTab::MyTasks).await
            } else {
                user.load_my_tasks(filter).await
            }
        }
        UserCommand::Task { id } => user.show_task_detail(id).await,
        UserCommand::Status { id, status } => {
            let auth = user.ctx().session.auth_headers();
            match user.ctx().api.get_task(&auth, id).await {
                Ok(task) => {
                    let mut modal = user.open_status_modal(id, task.status);
                    modal.status = status;
                    user.update_status(&modal).await
                }
                Err(e) => Err(e),
            }
        }
        UserCommand::Comment { id, text } => {
            let mut modal = user.open_comment_modal(id);
            modal.comment_text = text;
            user.add_comment(&mut modal).await
        }
    };

    print_document(&user.ctx().document);
    outcome?;
    Ok(())
}

fn print_document(doc: &Document) {
    for (id, html) in doc.containers() {
        println!("<!-- #{} -->", id);
        println!("{}", html);
    }
}
