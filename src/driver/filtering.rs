//! Pre-stack packet acceptance filter.
//!
//! Applied to every received frame before a replacement buffer is allocated,
//! so traffic that is not for this node never costs a pool allocation.
//!
//! The EtherType gate always applies: ARP and IPv6 pass through for the
//! stack to validate later, unknown frame types are refused. The deeper IPv4
//! checks - fragment rejection, header-length sanity, UDP port admission -
//! run only when [`FilterConfig::enabled`] is set.

use crate::buffer::FrameSink;
use crate::driver::config::FilterConfig;
use crate::internal::constants::{
    DNS_PORT, ETH_HEADER_SIZE, ETHERTYPE_ARP, ETHERTYPE_IPV4, ETHERTYPE_IPV6, IP_PROTO_UDP,
    IPV4_FRAGMENT_BITS, IPV4_MAX_VERSION_IHL, IPV4_MIN_VERSION_IHL, LLMNR_PORT, NBNS_PORT,
};

/// Decide whether a received frame is worth handing to the stack.
///
/// Returns `false` for traffic that should be shed before it consumes a
/// replacement-buffer allocation. The caller treats a rejection exactly like
/// an allocation failure: the original buffer is recycled in place.
pub fn may_accept_frame<S: FrameSink>(frame: &[u8], filter: &FilterConfig, sink: &mut S) -> bool {
    if frame.len() < ETH_HEADER_SIZE {
        return false;
    }

    let ethertype = u16::from_be_bytes([frame[12], frame[13]]);
    match ethertype {
        // Checked later by the stack.
        ETHERTYPE_ARP | ETHERTYPE_IPV6 => true,
        // Checked here.
        ETHERTYPE_IPV4 => filter_ipv4(&frame[ETH_HEADER_SIZE..], filter, sink),
        // Refuse the frame.
        _ => false,
    }
}

/// Deep checks on an IPv4 packet (`packet` starts at the IP header).
fn filter_ipv4<S: FrameSink>(packet: &[u8], filter: &FilterConfig, sink: &mut S) -> bool {
    if !filter.enabled {
        return true;
    }
    if packet.len() < 20 {
        return false;
    }

    // Only whole datagrams are handled; fragments are shed outright.
    let fragment_field = u16::from_be_bytes([packet[6], packet[7]]);
    if fragment_field & IPV4_FRAGMENT_BITS != 0 {
        return false;
    }

    // 0x45 is IPv4 with a 20-byte header, 0x4F the 60-byte maximum.
    let version_ihl = packet[0];
    if !(IPV4_MIN_VERSION_IHL..=IPV4_MAX_VERSION_IHL).contains(&version_ihl) {
        return false;
    }

    if packet[9] == IP_PROTO_UDP {
        let header_len = usize::from(version_ihl & 0x0F) * 4;
        let Some(udp) = packet.get(header_len..header_len + 8) else {
            return false;
        };
        let source_port = u16::from_be_bytes([udp[0], udp[1]]);
        let destination_port = u16::from_be_bytes([udp[2], udp[3]]);

        let mut wanted = sink.has_udp_listener(destination_port);
        if filter.llmnr {
            wanted = wanted || destination_port == LLMNR_PORT || source_port == LLMNR_PORT;
        }
        if filter.nbns {
            wanted = wanted || destination_port == NBNS_PORT || source_port == NBNS_PORT;
        }
        if filter.dns {
            wanted = wanted || source_port == DNS_PORT;
        }
        if !wanted {
            // Not for this node.
            return false;
        }
    }

    true
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;
    use crate::testing::MockSink;

    fn frame_with_ethertype(ethertype: u16) -> Vec<u8> {
        let mut frame = std::vec![0u8; 60];
        frame[12..14].copy_from_slice(&ethertype.to_be_bytes());
        frame
    }

    /// Minimal IPv4/UDP frame with the given ports.
    fn udp_frame(source_port: u16, destination_port: u16) -> Vec<u8> {
        let mut frame = frame_with_ethertype(ETHERTYPE_IPV4);
        frame[14] = 0x45; // version/IHL
        frame[23] = IP_PROTO_UDP;
        frame[34..36].copy_from_slice(&source_port.to_be_bytes());
        frame[36..38].copy_from_slice(&destination_port.to_be_bytes());
        frame
    }

    #[test]
    fn filter_accepts_arp_unconditionally() {
        let mut sink = MockSink::new();
        let filter = FilterConfig::new();
        assert!(may_accept_frame(
            &frame_with_ethertype(ETHERTYPE_ARP),
            &filter,
            &mut sink
        ));
    }

    #[test]
    fn filter_accepts_ipv6_unconditionally() {
        let mut sink = MockSink::new();
        let filter = FilterConfig::new();
        assert!(may_accept_frame(
            &frame_with_ethertype(ETHERTYPE_IPV6),
            &filter,
            &mut sink
        ));
    }

    #[test]
    fn filter_rejects_unknown_ethertype() {
        let mut sink = MockSink::new();
        let filter = FilterConfig::new();
        assert!(!may_accept_frame(
            &frame_with_ethertype(0x88CC),
            &filter,
            &mut sink
        ));
    }

    #[test]
    fn filter_rejects_runt_frames() {
        let mut sink = MockSink::new();
        let filter = FilterConfig::new();
        assert!(!may_accept_frame(&[0u8; 10], &filter, &mut sink));
    }

    #[test]
    fn filter_rejects_fragmented_ipv4() {
        let mut sink = MockSink::new();
        let filter = FilterConfig::new();

        // Non-zero fragment offset
        let mut frame = frame_with_ethertype(ETHERTYPE_IPV4);
        frame[14] = 0x45;
        frame[20] = 0x00;
        frame[21] = 0x08; // offset 8
        assert!(!may_accept_frame(&frame, &filter, &mut sink));

        // More-fragments flag set, offset zero (first fragment)
        let mut frame = frame_with_ethertype(ETHERTYPE_IPV4);
        frame[14] = 0x45;
        frame[20] = 0x20; // MF
        assert!(!may_accept_frame(&frame, &filter, &mut sink));
    }

    #[test]
    fn filter_rejects_bad_header_length() {
        let mut sink = MockSink::new();
        let filter = FilterConfig::new();

        for version_ihl in [0x44u8, 0x50, 0x65] {
            let mut frame = frame_with_ethertype(ETHERTYPE_IPV4);
            frame[14] = version_ihl;
            assert!(
                !may_accept_frame(&frame, &filter, &mut sink),
                "version/IHL {version_ihl:#04x} must be rejected"
            );
        }
    }

    #[test]
    fn filter_accepts_plain_ipv4_tcp() {
        let mut sink = MockSink::new();
        let filter = FilterConfig::new();
        let mut frame = frame_with_ethertype(ETHERTYPE_IPV4);
        frame[14] = 0x45;
        frame[23] = 6; // TCP
        assert!(may_accept_frame(&frame, &filter, &mut sink));
    }

    #[test]
    fn filter_rejects_udp_to_unregistered_port() {
        let mut sink = MockSink::new();
        let filter = FilterConfig::new();
        assert!(!may_accept_frame(&udp_frame(40000, 40001), &filter, &mut sink));
    }

    #[test]
    fn filter_accepts_udp_to_registered_port() {
        let mut sink = MockSink::new();
        sink.register_udp_port(40001);
        let filter = FilterConfig::new();
        assert!(may_accept_frame(&udp_frame(40000, 40001), &filter, &mut sink));
    }

    #[test]
    fn filter_accepts_dns_reply_by_source_port() {
        let mut sink = MockSink::new();
        let filter = FilterConfig::new();
        assert!(may_accept_frame(&udp_frame(DNS_PORT, 40001), &filter, &mut sink));
    }

    #[test]
    fn filter_dns_disabled_rejects_dns_reply() {
        let mut sink = MockSink::new();
        let filter = FilterConfig {
            dns: false,
            ..FilterConfig::new()
        };
        assert!(!may_accept_frame(&udp_frame(DNS_PORT, 40001), &filter, &mut sink));
    }

    #[test]
    fn filter_llmnr_and_nbns_admission() {
        let mut sink = MockSink::new();
        let filter = FilterConfig {
            llmnr: true,
            nbns: true,
            ..FilterConfig::new()
        };
        assert!(may_accept_frame(&udp_frame(40000, LLMNR_PORT), &filter, &mut sink));
        assert!(may_accept_frame(&udp_frame(LLMNR_PORT, 40000), &filter, &mut sink));
        assert!(may_accept_frame(&udp_frame(40000, NBNS_PORT), &filter, &mut sink));

        let off = FilterConfig::new();
        assert!(!may_accept_frame(&udp_frame(40000, LLMNR_PORT), &off, &mut sink));
    }

    #[test]
    fn filter_disabled_passes_ipv4_untouched() {
        let mut sink = MockSink::new();
        let filter = FilterConfig {
            enabled: false,
            ..FilterConfig::new()
        };
        // Fragmented UDP to an unregistered port - everything the deep
        // checks would shed - passes when the filter is disabled.
        let mut frame = udp_frame(40000, 40001);
        frame[21] = 0x08;
        assert!(may_accept_frame(&frame, &filter, &mut sink));
        // The EtherType gate still applies.
        assert!(!may_accept_frame(&frame_with_ethertype(0x1234), &filter, &mut sink));
    }

    #[test]
    fn filter_rejects_udp_header_past_end() {
        let mut sink = MockSink::new();
        let filter = FilterConfig::new();
        // IHL claims a 60-byte header but the frame is too short to hold
        // the UDP header behind it.
        let mut frame = frame_with_ethertype(ETHERTYPE_IPV4);
        frame[14] = 0x4F;
        frame[23] = IP_PROTO_UDP;
        assert!(!may_accept_frame(&frame, &filter, &mut sink));
    }
}
