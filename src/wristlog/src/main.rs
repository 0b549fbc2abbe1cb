#[macro_use]
extern crate log;

use std::{fmt::Display, io, num::NonZeroUsize, path::PathBuf, time::Duration};

use anyhow::{Context, anyhow};
use chrono::{FixedOffset, NaiveDate, TimeDelta, Utc};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dotenv::dotenv;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use wristlog::{
    JsonSampleSource, SampleSource, StreakState, StreakWorker, ThresholdArgs, TimestampUnit,
    report::{AmountsReport, SleepReport, StepReport, StreakReport},
};
use wristlog_algos::{
    ActivityAmountAggregator, AmountCache, ChartSeries, ConfigError, ConfigurationProvider,
    DailyTotals, SegmentationConfig, SeriesOptions, SleepSessionSegmenter, StepSessionSegmenter,
    StreakCalculator, ensure_start_and_end_samples,
    helpers::{
        format_hm::FormatHM,
        time_math::{day_of, day_range, day_start, shift_days},
    },
    minutes,
};
use wristlog_types::{ActivityAmounts, ActivitySample, Timestamp};

const WEEK_DAYS: i64 = 7;

fn steps(amounts: &ActivityAmounts) -> u64 {
    amounts.amounts().iter().map(|a| a.total_steps).sum()
}

#[derive(Parser)]
pub struct WristlogCli {
    #[command(flatten)]
    pub thresholds: ThresholdArgs,
    #[clap(subcommand)]
    pub subcommand: WristlogCommand,
}

#[derive(Subcommand)]
pub enum WristlogCommand {
    ///
    /// Detect sleep sessions and their stage breakdown
    ///
    SleepSessions {
        #[command(flatten)]
        input: InputArgs,
    },
    ///
    /// Detect walking, running and exercise sessions
    ///
    StepSessions {
        #[command(flatten)]
        input: InputArgs,
    },
    ///
    /// Time and steps spent in each activity kind, per day
    ///
    Amounts {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "7")]
        cache_days: NonZeroUsize,
    },
    ///
    /// Chart line series for the selected range
    ///
    Series {
        #[command(flatten)]
        input: InputArgs,
        #[arg(env, long, default_value_t = 10)]
        max_heart_rate_gap_minutes: i64,
    },
    ///
    /// Current and longest daily step goal streaks
    ///
    Streaks {
        #[command(flatten)]
        input: InputArgs,
        /// Day the scan starts from, defaults to the current day
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    ///
    /// Print shell completions
    ///
    Completions { shell: Shell },
}

#[derive(Args)]
pub struct InputArgs {
    /// JSON array of samples, each tagged with its `device`
    #[arg(env = "WRISTLOG_SAMPLES", long)]
    pub samples: PathBuf,
    /// Defaults to the first device in the file
    #[arg(env, long)]
    pub device: Option<String>,
    #[arg(env, long, default_value_t = TimestampUnit::Seconds)]
    pub timestamp_unit: TimestampUnit,
    #[arg(env, long, default_value_t = 0, allow_hyphen_values = true)]
    pub utc_offset_hours: i32,
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Add synthetic samples at the edges of the selected days
    #[arg(long)]
    pub pad: bool,
    #[arg(long)]
    pub json: bool,
}

struct Input {
    source: JsonSampleSource,
    device: String,
    offset: FixedOffset,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    pad: bool,
    json: bool,
}

impl Input {
    fn open(args: InputArgs) -> anyhow::Result<Self> {
        let offset = utc_offset(args.utc_offset_hours)?;
        let source = JsonSampleSource::open(&args.samples, args.timestamp_unit)
            .with_context(|| format!("Loading {}", args.samples.display()))?;

        let device = match args.device {
            Some(device) => device,
            None => source
                .device_ids()
                .next()
                .map(str::to_owned)
                .ok_or(anyhow!("No devices in {}", args.samples.display()))?,
        };

        Ok(Self {
            source,
            device,
            offset,
            from: args.from,
            to: args.to,
            pad: args.pad,
            json: args.json,
        })
    }

    fn range(&self) -> anyhow::Result<(Timestamp, Timestamp)> {
        let from = match self.from {
            Some(day) => day_start(day, self.offset).ok_or(anyhow!("Invalid day: {}", day))?,
            None => Timestamp::MIN,
        };
        let to = match self.to {
            Some(day) => day_range(day, self.offset)
                .map(|(_, end)| end)
                .ok_or(anyhow!("Invalid day: {}", day))?,
            None => Timestamp::MAX,
        };
        Ok((from, to))
    }

    fn samples_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> anyhow::Result<Vec<ActivitySample>> {
        let samples = self.source.get_samples(&self.device, from, to)?;
        if self.pad && from != Timestamp::MIN && to != Timestamp::MAX {
            return Ok(ensure_start_and_end_samples(&samples, from, to));
        }
        Ok(samples)
    }

    fn samples(&self) -> anyhow::Result<Vec<ActivitySample>> {
        let (from, to) = self.range()?;
        self.samples_between(from, to)
    }

    /// Selected days, falling back to the first and last recorded day.
    fn days(&self) -> anyhow::Result<Vec<NaiveDate>> {
        let recorded = self.source.all_samples(&self.device)?;
        let first = self
            .from
            .or_else(|| recorded.first().and_then(|s| day_of(s.timestamp, self.offset)));
        let last = self
            .to
            .or_else(|| recorded.last().and_then(|s| day_of(s.timestamp, self.offset)));

        let (Some(first), Some(last)) = (first, last) else {
            return Ok(Vec::new());
        };

        Ok(first.iter_days().take_while(|day| *day <= last).collect())
    }

    fn day_amounts(
        &self,
        cache: &mut AmountCache,
        day: NaiveDate,
    ) -> anyhow::Result<ActivityAmounts> {
        let (from, to) = day_range(day, self.offset).ok_or(anyhow!("Invalid day: {}", day))?;
        cache.get_or_try_insert_with(from, || {
            let samples = self.samples_between(from, to)?;
            Ok(ActivityAmountAggregator::calculate_activity_amounts(&samples))
        })
    }

    fn print<T>(&self, value: &T, text: impl Display) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text);
        }
        Ok(())
    }
}

fn utc_offset(hours: i32) -> anyhow::Result<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| anyhow!("Invalid utc offset: {}h", hours))
}

fn series_options(
    config: &SegmentationConfig,
    max_heart_rate_gap_minutes: i64,
) -> Result<SeriesOptions, ConfigError> {
    let max_heart_rate_gap = minutes("max_heart_rate_gap", max_heart_rate_gap_minutes)?;
    if max_heart_rate_gap <= TimeDelta::zero() {
        return Err(ConfigError::NotPositive("max_heart_rate_gap"));
    }

    Ok(SeriesOptions {
        heart_rate_range: config.heart_rate_range,
        max_heart_rate_gap,
        ..Default::default()
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = WristlogCli::parse();
    let thresholds = cli.thresholds;

    match cli.subcommand {
        WristlogCommand::SleepSessions { input } => {
            let input = Input::open(input)?;
            let config = thresholds.validated_segmentation_config()?;
            let segmenter = SleepSessionSegmenter::new(&config)?;

            let sessions = segmenter.calculate_sleep_sessions(&input.samples()?);
            input.print(
                &sessions,
                SleepReport {
                    sessions: &sessions,
                    offset: input.offset,
                },
            )
        }
        WristlogCommand::StepSessions { input } => {
            let input = Input::open(input)?;
            let config = thresholds.validated_segmentation_config()?;
            let segmenter = StepSessionSegmenter::new(&config)?;

            let samples = input.samples()?;
            let sessions = segmenter.calculate_step_sessions(&samples);
            let summary = StepSessionSegmenter::calculate_summary(
                &sessions,
                ActivityAmountAggregator::calculate_total_steps(&samples),
            );
            if let Some(ongoing) = StepSessionSegmenter::ongoing_session(&sessions) {
                info!("Session started at {} is still ongoing", ongoing.start);
            }

            input.print(
                &serde_json::json!({ "sessions": sessions, "summary": summary }),
                StepReport {
                    sessions: &sessions,
                    summary: &summary,
                    offset: input.offset,
                },
            )
        }
        WristlogCommand::Amounts { input, cache_days } => {
            let input = Input::open(input)?;
            let mut cache = AmountCache::new(cache_days);

            for day in input.days()? {
                // oldest first, so the cache evicts days that drop out of the window
                let mut week_sleep = 0_i64;
                let mut week_steps = 0_u64;
                for back in (1..WEEK_DAYS).rev() {
                    let Some(past) = shift_days(day, -back) else {
                        continue;
                    };
                    let amounts = input.day_amounts(&mut cache, past)?;
                    week_sleep += amounts.sleep_seconds();
                    week_steps += steps(&amounts);
                }
                let amounts = input.day_amounts(&mut cache, day)?;
                week_sleep += amounts.sleep_seconds();
                week_steps += steps(&amounts);

                if input.json {
                    println!(
                        "{}",
                        serde_json::json!({
                            "day": day,
                            "amounts": amounts.amounts(),
                            "week_sleep_seconds": week_sleep,
                            "week_steps": week_steps,
                        })
                    );
                } else {
                    println!(
                        "{}\n{}\nLast {} days: {} asleep, {} steps\n",
                        day,
                        AmountsReport(&amounts),
                        WEEK_DAYS,
                        week_sleep.format_hm(),
                        week_steps,
                    );
                }
            }
            Ok(())
        }
        WristlogCommand::Series {
            input,
            max_heart_rate_gap_minutes,
        } => {
            let input = Input::open(input)?;
            let config = thresholds.validated_segmentation_config()?;
            let options = series_options(&config, max_heart_rate_gap_minutes)?;

            let series = ChartSeries::build(&input.samples()?, &options);
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "activity": series.activity,
                    "deep_sleep": series.deep_sleep,
                    "light_sleep": series.light_sleep,
                    "rem_sleep": series.rem_sleep,
                    "not_worn": series.not_worn,
                    "heart_rate": series.heart_rate,
                }))?
            );
            Ok(())
        }
        WristlogCommand::Streaks { input, today } => {
            let input = Input::open(input)?;
            let calculator = StreakCalculator::new(thresholds.streak_config()?)?;
            let samples = input.source.all_samples(&input.device)?;
            let totals = DailyTotals::from_samples(samples, input.offset);
            let today =
                today.unwrap_or_else(|| Utc::now().with_timezone(&input.offset).date_naive());

            let worker = StreakWorker::spawn(calculator, totals, today);
            let token = worker.cancel_token();
            ctrlc::set_handler(move || token.cancel())?;

            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::with_template("{spinner} {msg} ({elapsed})")?);
            pb.set_message(format!("Scanning back from {}", today));
            pb.enable_steady_tick(Duration::from_millis(100));

            let mut state = StreakState::default();
            let finished = state.update(worker.join().await?);
            pb.finish_and_clear();

            match state.summary() {
                Some(summary) if finished => input.print(summary, StreakReport(summary)),
                _ => {
                    warn!("Streak scan cancelled");
                    Ok(())
                }
            }
        }
        WristlogCommand::Completions { shell } => {
            let mut command = WristlogCli::command();
            clap_complete::generate(shell, &mut command, "wristlog", &mut io::stdout());
            Ok(())
        }
    }
}
