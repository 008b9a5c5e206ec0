use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "rlaunch", version, about = "rlaunch Command Line Utility")]
pub struct Cli {
  /// Log filter used when RUST_LOG is unset (e.g. "rlaunch=debug")
  #[clap(long, global = true, default_value = "warn")]
  pub log: String,

  #[clap(subcommand)]
  pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
  /// Race a simulated job against a timeout
  Race(RaceArgs),
  /// Run a job after a delay and report when it actually started
  Delay(DelayArgs),
  /// Launch many timed jobs with random durations and summarize the outcomes
  Burst(BurstArgs),
}

#[derive(Parser, Debug)]
pub struct RaceArgs {
  /// Timeout in milliseconds
  #[clap(long, default_value_t = 2000)]
  pub timeout_ms: u64,

  /// How long the simulated job works, in milliseconds
  #[clap(long, default_value_t = 3000)]
  pub work_ms: u64,

  /// Value the job returns when it finishes
  #[clap(long, default_value_t = 42)]
  pub value: i64,

  /// Make the job fail instead of returning a value
  #[clap(long, action)]
  pub fail: bool,
}

#[derive(Parser, Debug)]
pub struct DelayArgs {
  /// Delay before the job starts, in milliseconds
  #[clap(long, default_value_t = 1000)]
  pub delay_ms: u64,
}

#[derive(Parser, Debug)]
pub struct BurstArgs {
  /// Number of jobs to launch
  #[clap(long, short = 'n', default_value_t = 100)]
  pub tasks: usize,

  /// Timeout applied to every job, in milliseconds
  #[clap(long, default_value_t = 50)]
  pub timeout_ms: u64,

  /// Upper bound of each job's random duration, in milliseconds
  #[clap(long, default_value_t = 100)]
  pub max_work_ms: u64,

  /// Cap on live threads (a timed job uses two)
  #[clap(long)]
  pub max_threads: Option<usize>,
}
