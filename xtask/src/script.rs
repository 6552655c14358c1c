use anyhow::{Context, Result};
use colored::Colorize;
use tas2505::clock::{AudioInterface, ClockPlan, InterfaceFormat, WordLength};
use tas2505::script::{total_delay_ms, write_count};
use tas2505::{Action, CONFIG_I2S_IN_SPEAKER_OUT};

/// Serial format accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    I2s,
    Dsp,
    RightJustified,
    LeftJustified,
}

impl From<Format> for InterfaceFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::I2s => Self::I2s,
            Format::Dsp => Self::Dsp,
            Format::RightJustified => Self::RightJustified,
            Format::LeftJustified => Self::LeftJustified,
        }
    }
}

pub fn run(sample_rate: Option<u32>, word_length: u8, format: Format) -> Result<()> {
    let word = WordLength::from_bits(word_length)
        .with_context(|| format!("unsupported word length: {word_length} bits"))?;
    let interface = AudioInterface {
        format: format.into(),
        word_length: word,
    };

    println!();
    let script = match sample_rate {
        None if interface == AudioInterface::default() => {
            println!(
                "{}",
                "🎛  Built-in bring-up script (22.05 kHz, I²S, 16-bit)"
                    .cyan()
                    .bold()
            );
            CONFIG_I2S_IN_SPEAKER_OUT
        }
        None => {
            println!(
                "{}",
                format!("🎛  Default clock plan, {format:?}, {word_length}-bit")
                    .cyan()
                    .bold()
            );
            ClockPlan::DEFAULT
                .configuration_script(interface)
                .context("default clock plan rejected")?
        }
        Some(hz) => {
            let plan = plan_for(hz, word)?;
            println!(
                "{}",
                format!("🎛  Bring-up script for {hz} Hz, {format:?}, {word_length}-bit")
                    .cyan()
                    .bold()
            );
            println!(
                "   {}",
                format!(
                    "P={} R={} J={} D={} NDAC={} MDAC={} DOSR={}",
                    plan.p, plan.r, plan.j, plan.d, plan.ndac, plan.mdac, plan.dosr
                )
                .dimmed()
            );
            plan.configuration_script(interface)
                .with_context(|| format!("clock plan for {hz} Hz rejected"))?
        }
    };
    println!();

    print_table(&script);

    println!();
    println!(
        "{}",
        format!(
            "✓ {} writes, {} ms of delays",
            write_count(&script),
            total_delay_ms(&script)
        )
        .green()
    );
    println!();
    Ok(())
}

fn plan_for(sample_rate_hz: u32, word: WordLength) -> Result<ClockPlan> {
    ClockPlan::for_sample_rate(sample_rate_hz, word)
        .with_context(|| format!("no clock plan for {sample_rate_hz} Hz"))
}

fn print_table(script: &[Action]) {
    println!(
        "  {}",
        format!("{:>3}  {:<36} {:>4} {:>4}  {:>5}", "#", "register", "page", "reg", "value").bold()
    );
    for (index, action) in script.iter().enumerate() {
        match action {
            Action::Write { register, value } => {
                let name = register.name().unwrap_or("?");
                println!(
                    "  {index:>3}  {name:<36} {:>4} {:>4}  {}",
                    register.page(),
                    register.address(),
                    format!("{value:#04x}").yellow()
                );
            }
            Action::Delay { ms } => {
                println!("  {index:>3}  {}", format!("delay {ms} ms").dimmed());
            }
        }
    }
}
