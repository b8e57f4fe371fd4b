use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};

use ferrous_pairing::{
    Mate, MateFacts, PairPlacement, PairedEndPolicy, PeOpt, PePolicy, defaults,
};

#[derive(Parser)]
#[command(name = "ferrous-pairing")]
#[command(about = "Paired-end mate geometry: search windows and pair classification", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbosity: 1=error, 2=warning, 3=message, 4=debug, 5+=trace
    #[arg(short = 'v', long, value_name = "INT", default_value_t = defaults::VERBOSITY, global = true)]
    verbosity: i32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute where the opposite mate must align, given one placed mate
    #[command(allow_negative_numbers = true)]
    Window {
        #[command(flatten)]
        pe: PolicyArgs,

        /// Which mate is placed (1 or 2)
        #[arg(short = 'm', long, value_name = "INT", default_value = "1", value_parser = clap::value_parser!(u8).range(1..=2))]
        mate: u8,

        /// Placed mate aligned to the reverse strand
        #[arg(long)]
        rc: bool,

        /// Leftmost reference offset of the placed mate (0-based)
        #[arg(long, value_name = "INT")]
        off: i64,

        /// Reference length of the placed mate
        #[arg(long, value_name = "INT")]
        len: u64,

        /// Length of the mate still to be found
        #[arg(long, value_name = "INT")]
        other_len: u64,

        /// Length of the reference sequence
        #[arg(long, value_name = "INT")]
        ref_len: u64,

        /// Indel slack allowed in the opposite mate's alignment
        #[arg(long, value_name = "INT", default_value_t = defaults::MAX_GAPS)]
        max_gaps: u32,

        /// Bases the search window may hang off either reference end
        #[arg(long, value_name = "INT", default_value_t = defaults::MAX_OVERHANG)]
        max_ohang: u32,
    },

    /// Classify one pair of mate placements
    #[command(allow_negative_numbers = true)]
    Classify {
        #[command(flatten)]
        pe: PolicyArgs,

        #[arg(value_name = "OFF1")]
        off1: i64,
        #[arg(value_name = "LEN1")]
        len1: u64,
        /// '+' or '-'
        #[arg(value_name = "STRAND1", value_parser = parse_strand, action = clap::ArgAction::Set)]
        fw1: bool,
        #[arg(value_name = "OFF2")]
        off2: i64,
        #[arg(value_name = "LEN2")]
        len2: u64,
        /// '+' or '-'
        #[arg(value_name = "STRAND2", value_parser = parse_strand, action = clap::ArgAction::Set)]
        fw2: bool,
    },

    /// Classify pairs read from a tab-separated file
    /// (off1 len1 strand1 off2 len2 strand2 per line)
    Batch {
        #[command(flatten)]
        pe: PolicyArgs,

        /// Input file ('-' for stdin)
        #[arg(value_name = "PAIRS.TSV", default_value = "-")]
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Number of threads (default: all cores)
        #[arg(short = 't', long, value_name = "INT")]
        threads: Option<usize>,
    },
}

#[derive(Args)]
struct PolicyArgs {
    /// Mate orientation policy: ff, rr, fr or rf
    #[arg(long, value_name = "STR", default_value = defaults::POLICY)]
    policy: String,

    /// Minimum fragment length
    #[arg(short = 'I', long = "minins", value_name = "INT", default_value_t = defaults::MIN_FRAG_LEN.to_string())]
    min_frag: String,

    /// Maximum fragment length ('inf' for no limit)
    #[arg(short = 'X', long = "maxins", value_name = "INT", default_value_t = defaults::MAX_FRAG_LEN.to_string())]
    max_frag: String,

    /// Fragment length range MIN,MAX (either side may be empty)
    #[arg(long, value_name = "MIN,MAX", conflicts_with_all = ["min_frag", "max_frag"])]
    frag_range: Option<String>,

    /// Search for the opposite mate with local alignment
    #[arg(long)]
    local: bool,

    /// Count dovetailed mates as concordant
    #[arg(long)]
    dovetail: bool,

    /// Do not count a mate containing the other as concordant
    #[arg(long)]
    no_contain: bool,

    /// Do not count overlapping mates as concordant
    #[arg(long)]
    no_overlap: bool,

    /// Treat pairs with a mate longer than the maximum fragment as discordant
    #[arg(long)]
    no_expand: bool,
}

impl PolicyArgs {
    fn to_opt(&self) -> Result<PeOpt> {
        let policy: PePolicy = self.policy.parse()?;
        let (min_frag, max_frag) = match &self.frag_range {
            Some(range) => PeOpt::parse_frag_range(range).map_err(|e| anyhow!(e))?,
            None => (
                PeOpt::parse_frag_len(&self.min_frag).map_err(|e| anyhow!(e))?,
                PeOpt::parse_frag_len(&self.max_frag).map_err(|e| anyhow!(e))?,
            ),
        };
        Ok(PeOpt {
            policy,
            min_frag,
            max_frag,
            local: self.local,
            dovetail_ok: self.dovetail,
            contain_ok: !self.no_contain,
            overlap_ok: !self.no_overlap,
            expand_to_fit: !self.no_expand,
        })
    }

    fn to_policy(&self) -> Result<PairedEndPolicy> {
        let opt = self.to_opt()?;
        log::info!("Paired-end options: {}", opt.describe());
        Ok(PairedEndPolicy::new(&opt)?)
    }
}

fn parse_strand(s: &str) -> Result<bool, String> {
    match s {
        "+" | "f" | "F" | "fw" => Ok(true),
        "-" | "r" | "R" | "rc" => Ok(false),
        _ => Err(format!("strand must be '+' or '-': {}", s)),
    }
}

fn strand_char(fw: bool) -> char {
    if fw { '+' } else { '-' }
}

fn parse_pair_line(line: &str) -> Result<PairPlacement> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 6 {
        bail!("expected 6 fields, got {}", fields.len());
    }
    Ok(PairPlacement {
        off1: fields[0].parse().context("bad off1")?,
        len1: fields[1].parse().context("bad len1")?,
        fw1: parse_strand(fields[2]).map_err(|e| anyhow!(e))?,
        off2: fields[3].parse().context("bad off2")?,
        len2: fields[4].parse().context("bad len2")?,
        fw2: parse_strand(fields[5]).map_err(|e| anyhow!(e))?,
    })
}

fn read_pairs(input: &Path) -> Result<Vec<PairPlacement>> {
    let reader: Box<dyn BufRead> = if input == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(input)
            .with_context(|| format!("Error opening pair file {}", input.display()))?;
        Box::new(BufReader::new(file))
    };

    let mut pairs = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.context("Error reading pair file")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let pair = parse_pair_line(line)
            .with_context(|| format!("{}:{}", input.display(), lineno + 1))?;
        pairs.push(pair);
    }
    Ok(pairs)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map verbosity (1=error, 2=warning, 3=message, 4=debug, 5+=trace)
    // to Rust log levels
    let log_level = match cli.verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    match cli.command {
        Commands::Window {
            pe,
            mate,
            rc,
            off,
            len,
            other_len,
            ref_len,
            max_gaps,
            max_ohang,
        } => {
            let policy = pe.to_policy()?;
            let facts = MateFacts {
                known: if mate == 1 { Mate::One } else { Mate::Two },
                fw: !rc,
                off,
                len,
                other_len,
                ref_len,
                max_gaps,
                max_ohang,
            };
            match policy.other_mate_window(&facts) {
                Some(w) => println!(
                    "{}\t{}\t{}\t{}",
                    if w.left { "left" } else { "right" },
                    strand_char(w.fw),
                    w.left_off,
                    w.right_off
                ),
                None => {
                    log::info!("No concordant window for mate {}", facts.known.other() as u8 + 1);
                    println!("none");
                }
            }
        }

        Commands::Classify {
            pe,
            off1,
            len1,
            fw1,
            off2,
            len2,
            fw2,
        } => {
            if len1 == 0 || len2 == 0 {
                bail!("mate lengths must be positive");
            }
            let policy = pe.to_policy()?;
            let class = policy.classify_pair(off1, len1, fw1, off2, len2, fw2);
            println!("{}\t{}", class, policy.is_concordant(class));
        }

        Commands::Batch {
            pe,
            input,
            output,
            threads,
        } => {
            let policy = pe.to_policy()?;

            if let Some(n) = threads {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n.max(1))
                    .build_global()
                    .context("Error configuring thread pool")?;
            }
            log::info!("Using {} threads", rayon::current_num_threads());

            let pairs = read_pairs(&input)?;
            if pairs.iter().any(|p| p.len1 == 0 || p.len2 == 0) {
                bail!("mate lengths must be positive");
            }
            log::info!("Classifying {} pairs", pairs.len());

            let classes = policy.classify_pairs(&pairs);

            let out: Box<dyn Write> = match output {
                Some(path) => Box::new(
                    File::create(&path)
                        .with_context(|| format!("Error creating output file {}", path.display()))?,
                ),
                None => Box::new(io::stdout()),
            };
            let mut out = BufWriter::new(out);

            let mut concordant = 0usize;
            for (p, class) in pairs.iter().zip(&classes) {
                let ok = policy.is_concordant(*class);
                concordant += ok as usize;
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    p.off1,
                    p.len1,
                    strand_char(p.fw1),
                    p.off2,
                    p.len2,
                    strand_char(p.fw2),
                    class,
                    ok
                )
                .context("Error writing output")?;
            }
            out.flush().context("Error writing output")?;

            log::info!("{} of {} pairs concordant", concordant, pairs.len());
        }
    }

    Ok(())
}
