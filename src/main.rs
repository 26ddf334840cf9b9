use anyhow::Result;
use clap::{Parser, Subcommand};
use feegate_api::models::{NewPayment, PaymentMethod};
use feegate_api::{FeeFilters, ListParams, Portal, StudentFilters, SubmissionFilters};
use feegate_config::Config;
use feegate_gateway::GatewayClient;
use feegate_store::FileSessionStore;
use std::{io::Write as _, path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "feegate", about = "feegate, the school fee-management admin CLI")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Authenticate against the backend and store the session.
    Login {
        /// Account username; the password is prompted on stdin.
        username: String,
    },
    /// Remove the stored session.
    Logout,
    /// Show the authenticated user's profile.
    Whoami,
    /// Student listing and details.
    #[command(subcommand)]
    Students(StudentsCmd),
    /// Fee listing.
    #[command(subcommand)]
    Fees(FeesCmd),
    /// GCash payment-submission review.
    #[command(subcommand)]
    Submissions(SubmissionsCmd),
    /// Payment recording.
    #[command(subcommand)]
    Payments(PaymentsCmd),
}

#[derive(Subcommand, Debug)]
enum StudentsCmd {
    /// List students.
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one student.
    Show { id: i64 },
    /// List one student's fees with the owed/outstanding summary.
    Fees { id: i64 },
}

#[derive(Subcommand, Debug)]
enum FeesCmd {
    /// List fees.
    List {
        /// Only fees issued to this student.
        #[arg(long)]
        student: Option<i64>,
        /// Filter by status (pending / partial / paid / waived / overdue).
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SubmissionsCmd {
    /// List payment submissions.
    List {
        /// Only submissions from this student.
        #[arg(long)]
        student: Option<i64>,
    },
    /// Approve a payment proof.
    Approve {
        id: i64,
        #[arg(long)]
        remarks: Option<String>,
    },
    /// Reject a payment proof; remarks are required.
    Reject {
        id: i64,
        #[arg(long)]
        remarks: String,
    },
}

#[derive(Subcommand, Debug)]
enum PaymentsCmd {
    /// Record one payment against a fee.
    Create {
        #[arg(long)]
        fee: i64,
        /// Decimal amount, e.g. 1500.00.
        #[arg(long)]
        amount: String,
        /// cash / gcash / bank / online / other (default: cash).
        #[arg(long, default_value = "cash")]
        method: String,
    },
    /// Record a batch of payments from a JSON file (array of payments).
    Bulk { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FEEGATE_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    let portal = make_portal(&config)?;

    match cli.command {
        Commands::Login { username } => cmd_login(&portal, &username).await,
        Commands::Logout => cmd_logout(&portal).await,
        Commands::Whoami => cmd_whoami(&portal).await,
        Commands::Students(cmd) => cmd_students(&portal, cmd).await,
        Commands::Fees(cmd) => cmd_fees(&portal, cmd).await,
        Commands::Submissions(cmd) => cmd_submissions(&portal, cmd).await,
        Commands::Payments(cmd) => cmd_payments(&portal, cmd).await,
    }
}

fn make_portal(config: &Config) -> Result<Portal> {
    let store = Arc::new(FileSessionStore::new(expand_home(&config.session_file)));
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    let gateway = Arc::new(GatewayClient::with_http(
        http,
        config.base_url.clone(),
        store,
        Arc::new(|| {
            eprintln!("session expired; run `feegate login` to sign in again");
        }),
    ));
    Ok(Portal::new(gateway))
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(path)
    }
}

async fn cmd_login(portal: &Portal, username: &str) -> Result<()> {
    print!("password: ");
    std::io::stdout().flush()?;
    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);

    portal
        .login(username, password)
        .await
        .map_err(|e| anyhow::anyhow!("login failed: {e}"))?;
    eprintln!("logged in as {username}");
    Ok(())
}

async fn cmd_logout(portal: &Portal) -> Result<()> {
    portal.logout().await?;
    eprintln!("logged out");
    Ok(())
}

async fn cmd_whoami(portal: &Portal) -> Result<()> {
    let profile = portal.profile().await?;
    println!("{} <{}> (id {})", profile.username, profile.email, profile.id);
    Ok(())
}

async fn cmd_students(portal: &Portal, cmd: StudentsCmd) -> Result<()> {
    match cmd {
        StudentsCmd::List { page, search } => {
            let params = ListParams::<StudentFilters> {
                page,
                search,
                ..Default::default()
            };
            let students = portal.students(&params).await?;
            for s in &students.data {
                println!(
                    "{:>6}  {:<12}  {:<30}  lvl {}  {}",
                    s.id,
                    s.student_id,
                    s.full_name(),
                    s.level,
                    s.program_name
                );
            }
            println!(
                "page {}/{} ({} students)",
                students.current_page, students.total_pages, students.total_items
            );
        }
        StudentsCmd::Show { id } => {
            let s = portal.student(id).await?;
            println!("{} ({})", s.full_name(), s.student_id);
            println!("  program: {}", s.program_name);
            println!("  level:   {}", s.level);
            println!("  status:  {:?}", s.status);
        }
        StudentsCmd::Fees { id } => {
            let fees = portal.student_fees(id, &ListParams::default()).await?;
            for f in &fees.data {
                println!(
                    "{:>6}  {:<24}  total {:>10}  balance {:>10}  {:?}",
                    f.id, f.category_name, f.total_amount, f.balance, f.status
                );
            }
            let summary = portal.student_fees_summary(id).await?;
            println!(
                "total {:.2}, outstanding {:.2}",
                summary.total_amount, summary.total_balance
            );
        }
    }
    Ok(())
}

async fn cmd_fees(portal: &Portal, cmd: FeesCmd) -> Result<()> {
    match cmd {
        FeesCmd::List { student, status } => {
            let params = ListParams {
                filters: FeeFilters {
                    student_id: student,
                    status,
                    ..Default::default()
                },
                ..Default::default()
            };
            let fees = portal.fees(&params).await?;
            for f in &fees.data {
                println!(
                    "{:>6}  student {:>6}  {:<24}  balance {:>10}  due {}",
                    f.id, f.student_id, f.category_name, f.balance, f.due_date
                );
            }
            println!("{} fees", fees.total_items);
        }
    }
    Ok(())
}

async fn cmd_submissions(portal: &Portal, cmd: SubmissionsCmd) -> Result<()> {
    match cmd {
        SubmissionsCmd::List { student } => {
            let params = ListParams {
                filters: SubmissionFilters {
                    student__id: student,
                    ..Default::default()
                },
                ..Default::default()
            };
            let subs = portal.submissions(&params).await?;
            for s in &subs.data {
                println!(
                    "{:>6}  student {:>6}  fee {:>6}  {:>10}  ref {:<16}  {:?}",
                    s.id, s.student_id, s.fee_id, s.amount_paid, s.reference_number, s.status
                );
            }
            let stats = Portal::submission_stats(&subs.data);
            println!(
                "{} pending / {} approved / {} rejected, total {:.2}",
                stats.pending, stats.approved, stats.rejected, stats.total_amount
            );
        }
        SubmissionsCmd::Approve { id, remarks } => {
            let sub = portal.approve_submission(id, remarks.as_deref()).await?;
            println!("submission {} approved ({})", sub.id, sub.amount_paid);
        }
        SubmissionsCmd::Reject { id, remarks } => {
            let sub = portal.reject_submission(id, &remarks).await?;
            println!("submission {} rejected", sub.id);
        }
    }
    Ok(())
}

async fn cmd_payments(portal: &Portal, cmd: PaymentsCmd) -> Result<()> {
    match cmd {
        PaymentsCmd::Create {
            fee,
            amount,
            method,
        } => {
            let payment = portal
                .create_payment(&NewPayment {
                    fee_id: fee,
                    amount_paid: amount,
                    payment_method: parse_method(&method)?,
                })
                .await?;
            println!("payment {} recorded against fee {}", payment.id, payment.fee_id);
        }
        PaymentsCmd::Bulk { file } => {
            let raw = std::fs::read(&file)?;
            let batch: Vec<NewPayment> = serde_json::from_slice(&raw)?;
            let created = portal.create_payments(&batch).await?;
            println!("{} payments recorded", created.len());
        }
    }
    Ok(())
}

fn parse_method(s: &str) -> Result<PaymentMethod> {
    match s {
        "cash" => Ok(PaymentMethod::Cash),
        "gcash" => Ok(PaymentMethod::Gcash),
        "bank" => Ok(PaymentMethod::Bank),
        "online" => Ok(PaymentMethod::Online),
        "other" => Ok(PaymentMethod::Other),
        other => anyhow::bail!("unknown payment method '{other}'"),
    }
}
