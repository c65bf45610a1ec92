use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reservoir_npv::app;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 저류층 시뮬레이션 요약 데이터로 NPV 목적함수를 계산한다.
#[derive(Parser)]
#[command(name = "reservoir_npv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 디버그 로그 출력
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = "npv.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 요약 파일을 읽어 목적함수 값을 계산한다
    Evaluate {
        /// 설정의 요약 경로 대신 사용할 기본 이름 (확장자 제외)
        #[arg(short, long)]
        summary: Option<PathBuf>,

        /// 과학적 표기 외에 원래 f64 값도 출력
        #[arg(long)]
        raw: bool,
    },

    /// 구성요소별 요약 벡터 키를 출력한다
    Keys,

    /// 예시 설정 파일을 만든다
    Init {
        /// 기존 파일 덮어쓰기
        #[arg(long)]
        force: bool,
    },
}

/// 프로그램의 엔트리 포인트. 로그를 초기화한 뒤 하위 명령을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let result = match cli.command {
        Commands::Evaluate { summary, raw } => app::evaluate(&cli.config, summary.as_deref(), raw),
        Commands::Keys => app::keys(&cli.config),
        Commands::Init { force } => app::init(&cli.config, force),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("오류: {err}");
            ExitCode::FAILURE
        }
    }
}
