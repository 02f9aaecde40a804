use std::path::Path;

use sonde_target::Introspector;
use sonde_target::emulation::{EmulationClassification, EmulationLayer, QueryKind};
use test_log::test;

use crate::common::{EMULATOR_PROBE, FakeHost, USER_MODE_PROBE, gdb_packet_reply};

#[test]
fn local_target_is_never_emulated() {
    let mut host = FakeHost::qemu_user();
    host.remote = false;

    let mut introspector = Introspector::new(host);

    assert!(!introspector.is_remote_target());
    assert!(!introspector.is_emulator());
    assert!(!introspector.is_user_mode_emulation());
    assert!(!introspector.is_user_mode_emulator());
    assert!(!introspector.is_kernel_mode_emulator());
    assert_eq!(introspector.emulated_process_id(), None);
    assert_eq!(introspector.classify(), EmulationClassification::native());

    assert!(introspector.host().requests.is_empty());
}

#[test]
fn user_mode_emulator() {
    let mut introspector = Introspector::new(FakeHost::qemu_user());

    assert!(introspector.is_remote_target());
    assert!(introspector.is_emulator());
    assert!(introspector.is_user_mode_emulation());
    assert!(introspector.is_user_mode_emulator());
    assert!(!introspector.is_kernel_mode_emulator());
}

#[test]
fn kernel_mode_emulator() {
    let mut introspector = Introspector::new(FakeHost::qemu_system());

    assert!(introspector.is_emulator());
    assert!(!introspector.is_user_mode_emulator());
    assert!(introspector.is_kernel_mode_emulator());

    let classification = introspector.classify();
    assert!(classification.is_emulated());
    assert_eq!(
        classification.emulation_layer(),
        Some(EmulationLayer::KernelMode)
    );
    assert_eq!(classification.emulated_process_id(), None);
}

#[test]
fn remote_stub_without_emulator() {
    // e.g., gdbserver, which doesn't understand QEMU packets
    let host = FakeHost::native()
        .remote()
        .respond(EMULATOR_PROBE, gdb_packet_reply(""))
        .respond(USER_MODE_PROBE, gdb_packet_reply("Text=0;Data=0;Bss=0"));

    let mut introspector = Introspector::new(host);

    assert!(!introspector.is_emulator());
    assert!(introspector.is_user_mode_emulation());
    assert!(!introspector.is_user_mode_emulator());
    assert!(!introspector.is_kernel_mode_emulator());
    assert_eq!(introspector.classify(), EmulationClassification::native());
}

#[test]
fn modes_are_mutually_exclusive() {
    for host in [
        FakeHost::native(),
        FakeHost::qemu_user(),
        FakeHost::qemu_system(),
        FakeHost::qemu_user().fail(USER_MODE_PROBE),
        FakeHost::qemu_user().fail(EMULATOR_PROBE),
    ] {
        let mut introspector = Introspector::new(host);

        let user = introspector.is_user_mode_emulator();
        let kernel = introspector.is_kernel_mode_emulator();

        if introspector.is_emulator() {
            assert_ne!(user, kernel);
        } else {
            assert!(!user && !kernel);
        }
    }
}

#[test]
fn user_mode_marker_is_case_sensitive() {
    let host = FakeHost::qemu_user().respond(USER_MODE_PROBE, gdb_packet_reply("text=0;data=0"));
    let mut introspector = Introspector::new(host);

    assert!(!introspector.is_user_mode_emulation());
    assert!(introspector.is_kernel_mode_emulator());
}

#[test]
fn failed_request_is_negative() {
    let mut introspector = Introspector::new(FakeHost::qemu_user().fail(EMULATOR_PROBE));

    assert!(!introspector.is_emulator());
    assert_eq!(introspector.classify(), EmulationClassification::native());
}

#[test]
fn per_stop_answers_recomputed_after_resume() {
    let mut introspector = Introspector::new(FakeHost::qemu_user());

    assert!(introspector.is_emulator());
    assert!(introspector.is_emulator());
    assert!(introspector.is_user_mode_emulator());
    assert!(
        introspector
            .classifier()
            .cache()
            .is_cached(QueryKind::UserModeEmulator)
    );

    assert_eq!(introspector.host().requests_to(EMULATOR_PROBE), 1);
    assert_eq!(introspector.host().requests_to(USER_MODE_PROBE), 1);

    introspector.on_resume();

    assert!(
        !introspector
            .classifier()
            .cache()
            .is_cached(QueryKind::Emulator)
    );

    assert!(introspector.is_user_mode_emulator());

    assert_eq!(introspector.host().requests_to(EMULATOR_PROBE), 2);
    assert_eq!(introspector.host().requests_to(USER_MODE_PROBE), 2);
}

#[test]
fn kernel_mode_skips_user_mode_probe_when_not_emulated() {
    let host = FakeHost::native()
        .remote()
        .respond(EMULATOR_PROBE, gdb_packet_reply(""));
    let mut introspector = Introspector::new(host);

    assert!(!introspector.is_kernel_mode_emulator());
    assert!(!introspector.is_user_mode_emulator());
    assert_eq!(introspector.host().requests_to(USER_MODE_PROBE), 0);
}

#[test]
fn emulated_pid_without_own_connections() {
    let host = FakeHost::qemu_user()
        .process(100, "qemu-aarch64", &["127.0.0.1:1234"])
        .process(101, "qemu-arm", &["127.0.0.1:1235"]);

    let mut introspector = Introspector::new(host);

    assert_eq!(introspector.emulated_process_id(), None);
    assert_eq!(introspector.host().process_listings.get(), 0);
}

#[test]
fn emulated_pid_matches_local_address() {
    let host = FakeHost::qemu_user()
        .connected_to("127.0.0.1:1234")
        .process(1, "systemd", &["127.0.0.1:1234"])
        .process(100, "qemu-arm", &["127.0.0.1:4321"])
        .process(101, "qemu-aarch64", &["0.0.0.0:22", "127.0.0.1:1234"]);

    let mut introspector = Introspector::new(host);

    assert_eq!(introspector.emulated_process_id(), Some(101));
    assert_eq!(
        introspector.classify(),
        EmulationClassification::user_mode(Some(101))
    );
}

#[test]
fn emulated_pid_first_match_wins() {
    let host = FakeHost::qemu_user()
        .connected_to("127.0.0.1:1234")
        .process(200, "qemu-mips", &["127.0.0.1:1234"])
        .process(100, "qemu-mips", &["127.0.0.1:1234"]);

    let mut introspector = Introspector::new(host);

    assert_eq!(introspector.emulated_process_id(), Some(200));
}

#[test]
fn emulated_pid_skips_inaccessible_process() {
    let host = FakeHost::qemu_user()
        .connected_to("[::1]:1234")
        .inaccessible_process(100, "qemu-x86_64")
        .process(101, "qemu-x86_64", &["[::1]:1234"]);

    let mut introspector = Introspector::new(host);

    assert_eq!(introspector.emulated_process_id(), Some(101));
}

#[test]
fn emulated_pid_none_for_kernel_mode() {
    let host = FakeHost::qemu_system()
        .connected_to("127.0.0.1:1234")
        .process(100, "qemu-system-x86_64", &["127.0.0.1:1234"]);

    let mut introspector = Introspector::new(host);

    assert_eq!(introspector.emulated_process_id(), None);
    assert_eq!(introspector.host().process_listings.get(), 0);
}

#[test]
fn emulated_pid_kept_for_session() {
    let host = FakeHost::qemu_user()
        .connected_to("127.0.0.1:1234")
        .process(100, "qemu-riscv64", &["127.0.0.1:1234"]);

    let mut introspector = Introspector::new(host);

    assert_eq!(introspector.emulated_process_id(), Some(100));
    introspector.on_resume();
    assert_eq!(introspector.emulated_process_id(), Some(100));
    assert_eq!(introspector.host().process_listings.get(), 1);

    introspector.on_new_target();
    assert_eq!(introspector.emulated_process_id(), Some(100));
    assert_eq!(introspector.host().process_listings.get(), 2);
}

#[test]
fn sysroot_missing_directory() {
    let mut host = FakeHost::qemu_user();
    host.arch = "aarch64".to_owned();

    let mut introspector = Introspector::new(host);

    assert_eq!(introspector.sysroot_override(), None);
    assert!(introspector.host().search_roots.is_empty());
}

#[test]
fn sysroot_applied_once_per_stop() {
    let mut host = FakeHost::qemu_user().with_dir("/etc/qemu-binfmt/arm");
    host.arch = "armv7".to_owned();

    let mut introspector = Introspector::new(host);

    let sysroot = Path::new("/etc/qemu-binfmt/arm");

    assert_eq!(introspector.sysroot_override().as_deref(), Some(sysroot));
    assert_eq!(introspector.sysroot_override().as_deref(), Some(sysroot));
    assert_eq!(introspector.host().search_roots, vec![sysroot.to_path_buf()]);

    introspector.on_resume();

    assert_eq!(introspector.sysroot_override().as_deref(), Some(sysroot));
    assert_eq!(introspector.host().search_roots.len(), 2);
}

#[test]
fn sysroot_ignored_for_kernel_mode() {
    let mut host = FakeHost::qemu_system().with_dir("/etc/qemu-binfmt/x86_64");
    host.arch = "x86-64".to_owned();

    let mut introspector = Introspector::new(host);

    assert_eq!(introspector.sysroot_override(), None);
    assert!(introspector.host().search_roots.is_empty());
}
