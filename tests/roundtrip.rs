use std::fs;

use eni::{AddrFamily, AddrSource, Error, InterfaceSet, Netmask};
use tempfile::tempdir;

const SAMPLE: &str = "\
# The loopback network interface
auto lo
iface lo inet loopback

source /etc/network/interfaces.d/*

auto eth0
allow-hotplug eth0
iface eth0 inet static
    address 192.168.1.10/24
    gateway 192.168.1.1
    dns-nameservers 8.8.8.8 1.1.1.1
    hwaddress 00:11:22:33:44:55
iface eth0 inet6 static
    address 2001:db8::10
    netmask 64

iface wlan0 inet dhcp
    wpa-ssid homenet
    wpa-psk s3cret
";

#[test]
fn parse_from_records_source_path() {
    let dir = tempdir().expect("should create temp dir");
    let path = dir.path().join("interfaces");
    fs::write(&path, SAMPLE).expect("should write sample file");

    let set = InterfaceSet::parse_from(&path).expect("sample file should parse");
    assert_eq!(set.path.as_deref(), Some(path.as_path()));
    assert_eq!(set.others, vec!["source /etc/network/interfaces.d/*"]);

    let eth0 = set.adapter("eth0").expect("eth0 should exist");
    assert!(eth0.auto);
    assert!(eth0.hotplug);
    assert_eq!(eth0.stanzas.len(), 2);
    assert_eq!(eth0.stanzas[0].family, AddrFamily::Inet);
    assert_eq!(
        eth0.stanzas[0].netmask,
        Some(Netmask::Dotted("255.255.255.0".parse().expect("mask")))
    );
    assert_eq!(eth0.stanzas[1].netmask, Some(Netmask::Prefix(64)));

    let wlan0 = set.adapter("wlan0").expect("wlan0 should exist");
    assert_eq!(wlan0.stanzas[0].source, AddrSource::Dhcp);
}

#[test]
fn parse_write_reparse_preserves_the_model() {
    let dir = tempdir().expect("should create temp dir");
    let src = dir.path().join("interfaces");
    let dst = dir.path().join("output");
    fs::write(&src, SAMPLE).expect("should write sample file");

    let first = InterfaceSet::parse_from(&src).expect("sample file should parse");
    first.write_to(&dst).expect("render should be written");

    let second = InterfaceSet::parse_from(&dst).expect("rendered file should parse back");
    assert_eq!(second.others, first.others);
    assert_eq!(second.adapters, first.adapters);
}

#[test]
fn written_file_starts_with_fixed_header_and_leaves_no_staging_file() {
    let dir = tempdir().expect("should create temp dir");
    let dst = dir.path().join("interfaces");

    let set: InterfaceSet = "auto eth0\niface eth0 inet dhcp\n"
        .parse()
        .expect("text should parse");
    set.write_to(&dst).expect("render should be written");

    let written = fs::read_to_string(&dst).expect("output should be readable");
    assert!(written.starts_with(
        "# interfaces(5) file used by ifup(8) and ifdown(8)\n\
         # Include files from /etc/network/interfaces.d:\n"
    ));
    assert!(written.contains("auto eth0\niface eth0 inet dhcp\n"));
    assert!(!dir.path().join("interfaces.tmp").exists());
}

#[test]
fn write_replaces_existing_destination() {
    let dir = tempdir().expect("should create temp dir");
    let dst = dir.path().join("interfaces");
    fs::write(&dst, "stale content\n").expect("should seed destination");

    let set: InterfaceSet = "iface lo inet loopback\n"
        .parse()
        .expect("text should parse");
    set.write_to(&dst).expect("render should be written");

    let written = fs::read_to_string(&dst).expect("output should be readable");
    assert!(!written.contains("stale content"));
    assert!(written.contains("iface lo inet loopback\n"));
}

#[test]
fn unreadable_path_propagates_io_error() {
    let dir = tempdir().expect("should create temp dir");
    let missing = dir.path().join("no-such-file");

    let err = InterfaceSet::parse_from(&missing).expect_err("missing file should fail");
    match err {
        Error::Io(io_err) => assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected Error::Io, got {other}"),
    }
}
