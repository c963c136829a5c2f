use std::net::Ipv4Addr;

use gungnir_lib::{checksum, inject, InjectionSink, RipInjection};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Sink that keeps every frame it is handed.
#[derive(Default)]
struct CaptureSink {
    frames: Vec<Vec<u8>>,
}

impl InjectionSink for CaptureSink {
    fn inject(&mut self, frame: &[u8]) -> gungnir_lib::Result<usize> {
        self.frames.push(frame.to_vec());
        Ok(frame.len())
    }
}

/// A spec with the randomised defaults pinned so byte asserts hold.
fn base_spec() -> RipInjection {
    let mut spec = RipInjection::default();
    spec.ip.id = 0x1234;
    spec.ip.src = Ipv4Addr::new(10, 0, 0, 1);
    spec.rip.tag = 7;
    spec
}

#[test]
fn defaults_build_a_ripv2_request() -> TestResult {
    let mut spec = base_spec();
    spec.link_mode = true;
    spec.device = Some("test0".into());
    spec.ether.src = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    spec.apply_defaults()?;

    assert_eq!(spec.ip.dst, Ipv4Addr::new(224, 0, 0, 9), "RIPv2 goes to the multicast group");
    assert_eq!(spec.rip.mask, Ipv4Addr::new(255, 255, 255, 0));

    let frame = spec.build();
    assert_eq!(frame.len(), 66);
    assert!(frame.len() >= 64);

    // Ethernet: broadcast destination, IPv4 EtherType
    assert_eq!(&frame[0..6], &[0xff; 6]);
    assert_eq!(&frame[12..14], &[0x08, 0x00]);

    // IP: reliability TOS, TTL 255, UDP, IP-inclusive length
    assert_eq!(frame[14], 0x45);
    assert_eq!(frame[15], 0x04);
    assert_eq!(&frame[16..18], &52u16.to_be_bytes());
    assert_eq!(frame[22], 255);
    assert_eq!(frame[23], 17);

    // UDP: both ports 520, length covers header + RIP block
    assert_eq!(&frame[34..36], &520u16.to_be_bytes());
    assert_eq!(&frame[36..38], &520u16.to_be_bytes());
    assert_eq!(&frame[38..40], &32u16.to_be_bytes());

    // RIP: request, version 2, AF 2, the defaulted class-C mask
    assert_eq!(frame[42], 1);
    assert_eq!(frame[43], 2);
    assert_eq!(&frame[46..48], &2u16.to_be_bytes());
    assert_eq!(&frame[54..58], &[255, 255, 255, 0]);
    assert_eq!(&frame[62..66], &1u32.to_be_bytes());
    Ok(())
}

#[test]
fn link_frames_carry_a_valid_ip_checksum() -> TestResult {
    let mut spec = base_spec();
    spec.link_mode = true;
    spec.device = Some("test0".into());
    spec.ether.src = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    spec.ip.dst = Ipv4Addr::new(224, 0, 0, 9);
    spec.apply_defaults()?;

    let frame = spec.build();
    // checksumming a completed header, checksum field included, yields zero
    assert_eq!(checksum::inet_checksum(0, &frame[14..34]), 0);
    assert_ne!(&frame[24..26], &[0, 0], "checksum field must be written");
    Ok(())
}

#[test]
fn udp_checksum_verifies_against_the_pseudo_header() -> TestResult {
    let mut spec = base_spec();
    spec.ip.dst = Ipv4Addr::new(192, 168, 1, 9);
    spec.payload = vec![0xaa, 0xbb, 0xcc];
    spec.apply_defaults()?;

    let frame = spec.build();
    let span = 8 + spec.payload.len();
    let seed = checksum::pseudo_sum(spec.ip.src, spec.ip.dst, 17, span as u16);
    assert_eq!(checksum::inet_checksum(seed, &frame[20..20 + span]), 0);
    Ok(())
}

#[test]
fn raw_mode_leaves_ip_checksum_to_the_kernel() -> TestResult {
    let mut spec = base_spec();
    spec.ip.dst = Ipv4Addr::new(192, 168, 1, 9);
    spec.apply_defaults()?;

    let frame = spec.build();
    assert_eq!(frame.len(), 52, "raw frames start at the IP header");
    assert_eq!(&frame[10..12], &[0, 0]);
    Ok(())
}

#[test]
fn ip_options_splice_in_after_the_header() -> TestResult {
    let mut spec = base_spec();
    spec.ip.dst = Ipv4Addr::new(192, 168, 1, 9);
    spec.ip_options = vec![0x01, 0x01, 0x01, 0x00];
    spec.apply_defaults()?;

    let frame = spec.build();
    assert_eq!(frame.len(), 56);
    assert_eq!(frame[0] & 0x0f, 6, "IHL must grow by one word");
    assert_eq!(&frame[2..4], &56u16.to_be_bytes(), "total length must include the options");
    assert_eq!(&frame[20..24], &[0x01, 0x01, 0x01, 0x00]);
    assert_eq!(&frame[24..26], &520u16.to_be_bytes(), "UDP follows the options");
    Ok(())
}

#[test]
fn invalid_ip_options_are_discarded() -> TestResult {
    let mut spec = base_spec();
    spec.ip.dst = Ipv4Addr::new(192, 168, 1, 9);
    spec.ip_options = vec![0x01, 0x01, 0x01];
    spec.apply_defaults()?;

    let frame = spec.build();
    assert_eq!(frame.len(), 52, "the frame goes out without the bad options");
    assert_eq!(frame[0] & 0x0f, 5);
    Ok(())
}

#[test]
fn payload_extends_every_length_field() -> TestResult {
    let mut spec = base_spec();
    spec.ip.dst = Ipv4Addr::new(192, 168, 1, 9);
    spec.payload = vec![0x55; 10];
    spec.apply_defaults()?;

    let frame = spec.build();
    assert_eq!(frame.len(), 62);
    assert_eq!(&frame[2..4], &62u16.to_be_bytes());
    assert_eq!(&frame[24..26], &42u16.to_be_bytes());
    assert_eq!(&frame[52..62], &[0x55; 10]);
    Ok(())
}

#[test]
fn ripv1_destination_defaults_to_directed_broadcast() -> TestResult {
    let mut spec = base_spec();
    spec.rip.ver = 1;
    spec.apply_defaults()?;

    assert_eq!(spec.ip.dst.octets()[3], 255, "host octet must be 255");
    assert_eq!(spec.rip.mask, Ipv4Addr::UNSPECIFIED, "RIPv1 has no mask default");
    Ok(())
}

#[test]
fn explicit_zero_domain_survives_ripv2() -> TestResult {
    let mut spec = base_spec();
    spec.rip.domain = 0;
    spec.domain_set = true;
    spec.apply_defaults()?;

    assert_eq!(spec.rip.domain, 0);
    Ok(())
}

#[test]
fn build_is_deterministic() -> TestResult {
    let mut spec = base_spec();
    spec.ip.dst = Ipv4Addr::new(192, 168, 1, 9);
    spec.rip.addr = Ipv4Addr::new(10, 9, 8, 7);
    spec.apply_defaults()?;

    assert_eq!(spec.build(), spec.build());
    Ok(())
}

#[test]
fn submit_hands_the_whole_frame_to_the_sink() -> TestResult {
    let mut spec = base_spec();
    spec.ip.dst = Ipv4Addr::new(192, 168, 1, 9);
    spec.apply_defaults()?;
    let frame = spec.build();

    let mut sink = CaptureSink::default();
    let n = inject::submit(&mut sink, &frame)?;
    assert_eq!(n, frame.len());
    assert_eq!(sink.frames, vec![frame]);
    Ok(())
}
