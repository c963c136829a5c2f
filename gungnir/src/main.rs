#![forbid(unsafe_code)]

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use clap::{ArgAction, CommandFactory, Parser};
use gungnir_lib::{blob, dump, inject, value, CraftError, RipInjection};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Device names and file paths are refused past this length.
const MAX_NAME_LEN: usize = 255;

/// RIP packet injector: crafts one RIP-over-UDP-over-IP frame from the
/// options below and emits it on a raw socket, or on a device when one is
/// given.
#[derive(Parser, Debug)]
#[command(
    name = "gungnir",
    about = "RIP packet injector",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// RIP command (1 request, 2 response)
    #[arg(short = 'c', value_name = "CMD")]
    command: Option<u8>,

    /// RIP version
    #[arg(short = 'V', value_name = "VER")]
    version: Option<u8>,

    /// RIP routing domain
    #[arg(short = 'r', value_name = "DOMAIN")]
    domain: Option<u16>,

    /// RIP address family
    #[arg(short = 'a', value_name = "AF")]
    address_family: Option<u16>,

    /// RIP route tag
    #[arg(short = 'R', value_name = "TAG")]
    route_tag: Option<u16>,

    /// RIP route address
    #[arg(short = 'i', value_name = "ADDR")]
    route_addr: Option<Ipv4Addr>,

    /// RIP network address mask
    #[arg(short = 'k', value_name = "MASK")]
    mask: Option<Ipv4Addr>,

    /// RIP next hop address
    #[arg(short = 'h', value_name = "ADDR")]
    next_hop: Option<Ipv4Addr>,

    /// RIP metric
    #[arg(short = 'm', value_name = "METRIC")]
    metric: Option<u32>,

    /// UDP source port
    #[arg(short = 'x', value_name = "PORT")]
    sport: Option<u16>,

    /// UDP destination port
    #[arg(short = 'y', value_name = "PORT")]
    dport: Option<u16>,

    /// IP source address
    #[arg(short = 'S', value_name = "ADDR")]
    src: Option<Ipv4Addr>,

    /// IP destination address
    #[arg(short = 'D', value_name = "ADDR")]
    dst: Option<Ipv4Addr>,

    /// IP ID
    #[arg(short = 'I', value_name = "ID")]
    ip_id: Option<u16>,

    /// IP TTL
    #[arg(short = 'T', value_name = "TTL")]
    ttl: Option<u8>,

    /// IP type of service
    #[arg(short = 't', value_name = "TOS")]
    tos: Option<u8>,

    /// IP fragmentation options: [D],[M],[R],[offset]
    #[arg(short = 'F', value_name = "FRAG")]
    frag: Option<String>,

    /// IP options file
    #[arg(short = 'O', value_name = "FILE")]
    ip_options_file: Option<PathBuf>,

    /// Ethernet device name (switches to link-layer injection)
    #[arg(short = 'd', value_name = "DEVICE")]
    device: Option<String>,

    /// Ethernet source MAC address
    #[arg(short = 'H', value_name = "MAC")]
    src_mac: Option<String>,

    /// Ethernet destination MAC address
    #[arg(short = 'M', value_name = "MAC")]
    dst_mac: Option<String>,

    /// Payload file
    #[arg(short = 'P', value_name = "FILE")]
    payload_file: Option<PathBuf>,

    /// Verbosity; -vv dumps the frame in hex+ASCII, -vvv in raw hex
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Print usage
    #[arg(short = '?', long = "help", action = ArgAction::SetTrue)]
    help: bool,
}

fn main() {
    // A leading `help` word triggers usage the same way `-?` does.
    if std::env::args().nth(1).is_some_and(|arg| arg.starts_with("help")) {
        print_usage();
    }

    let cli = Cli::parse();
    if cli.help {
        print_usage();
    }
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => println!("RIP Packet Injected"),
        Err(err) => {
            error!(%err, "RIP injection failure");
            std::process::exit(1);
        }
    }
}

fn print_usage() -> ! {
    let _ = Cli::command().print_help();
    std::process::exit(1);
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();
}

fn run(cli: &Cli) -> gungnir_lib::Result<()> {
    let mut spec = spec_from(cli)?;
    spec.apply_defaults()?;

    if cli.verbose > 0 {
        log_headers(&spec);
    }

    if let Some(path) = &cli.payload_file {
        check_path(path)?;
        let cap = if spec.link_mode { blob::MAX_LINK_PAYLOAD } else { blob::MAX_RAW_PAYLOAD };
        spec.payload = blob::read_blob(path, cap)?;
    }
    if let Some(path) = &cli.ip_options_file {
        check_path(path)?;
        spec.ip_options = blob::read_blob(path, blob::MAX_IP_OPTIONS)?;
    }

    let frame = spec.build();
    match cli.verbose {
        2 => print!("{}", dump::hex_ascii(&frame)),
        v if v >= 3 => print!("{}", dump::hex_raw(&frame)),
        _ => {}
    }

    let mut sink = inject::open_sink(&spec)?;
    inject::submit(sink.as_mut(), &frame)?;
    Ok(())
}

fn spec_from(cli: &Cli) -> gungnir_lib::Result<RipInjection> {
    let mut spec = RipInjection::default();

    if let Some(v) = cli.command {
        spec.rip.cmd = v;
    }
    if let Some(v) = cli.version {
        spec.rip.ver = v;
    }
    if let Some(v) = cli.domain {
        spec.rip.domain = v;
        spec.domain_set = true;
    }
    if let Some(v) = cli.address_family {
        spec.rip.af = v;
    }
    if let Some(v) = cli.route_tag {
        spec.rip.tag = v;
    }
    if let Some(v) = cli.route_addr {
        spec.rip.addr = v;
    }
    if let Some(v) = cli.mask {
        spec.rip.mask = v;
    }
    if let Some(v) = cli.next_hop {
        spec.rip.next_hop = v;
    }
    if let Some(v) = cli.metric {
        spec.rip.metric = v;
    }
    if let Some(v) = cli.sport {
        spec.udp.sport = v;
    }
    if let Some(v) = cli.dport {
        spec.udp.dport = v;
    }
    if let Some(v) = cli.src {
        spec.ip.src = v;
    }
    if let Some(v) = cli.dst {
        spec.ip.dst = v;
    }
    if let Some(v) = cli.ip_id {
        spec.ip.id = v;
    }
    if let Some(v) = cli.ttl {
        spec.ip.ttl = v;
    }
    if let Some(v) = cli.tos {
        spec.ip.tos = v;
    }
    if let Some(text) = &cli.frag {
        spec.ip.frag = value::parse_frag_options(text)?;
    }
    if let Some(mac) = &cli.src_mac {
        spec.ether.src = parse_mac(mac)?;
    }
    if let Some(mac) = &cli.dst_mac {
        spec.ether.dst = parse_mac(mac)?;
    }
    if let Some(dev) = &cli.device {
        if dev.len() > MAX_NAME_LEN {
            return Err(CraftError::Device(format!(
                "device name exceeds {MAX_NAME_LEN} characters"
            )));
        }
        spec.device = Some(dev.clone());
        spec.link_mode = true;
    }

    Ok(spec)
}

fn parse_mac(text: &str) -> gungnir_lib::Result<[u8; 6]> {
    value::parse_bytes(text, 6)?
        .try_into()
        .map_err(|_| CraftError::Value(format!("`{text}` is not a MAC address")))
}

fn check_path(path: &Path) -> gungnir_lib::Result<()> {
    if path.as_os_str().len() > MAX_NAME_LEN {
        return Err(CraftError::Blob(format!("path exceeds {MAX_NAME_LEN} characters")));
    }
    Ok(())
}

fn log_headers(spec: &RipInjection) {
    if spec.link_mode {
        info!(
            src = %value::format_mac(&spec.ether.src),
            dst = %value::format_mac(&spec.ether.dst),
            "Ethernet header"
        );
    }
    info!(
        src = %spec.ip.src,
        dst = %spec.ip.dst,
        tos = spec.ip.tos,
        id = spec.ip.id,
        ttl = spec.ip.ttl,
        frag = spec.ip.frag,
        "IP header"
    );
    info!(sport = spec.udp.sport, dport = spec.udp.dport, "UDP header");
    info!(
        cmd = spec.rip.cmd,
        ver = spec.rip.ver,
        domain = spec.rip.domain,
        af = spec.rip.af,
        tag = spec.rip.tag,
        addr = %spec.rip.addr,
        mask = %spec.rip.mask,
        next_hop = %spec.rip.next_hop,
        metric = spec.rip.metric,
        "RIP header"
    );
}
