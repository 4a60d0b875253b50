//! Interactive CLI demo of the full SigNote lifecycle.
//!
//! Walks through trust-root chartering, note minting and sealing, multi-hop
//! custody transfers, full-chain verification, and a tampering attempt that
//! gets caught. The output uses ANSI escape codes for colored,
//! storytelling-style terminal rendering.
//!
//! Run with:
//!   cargo run --example demo --release

use std::time::Instant;

use signote_protocol::crypto::keys::NoteKeypair;
use signote_protocol::note::init::{InitSection, InitSectionBuilder};
use signote_protocol::note::{append_checkpoint, verify, VerificationReport};
use signote_protocol::sources::{random_nonce, tai64n_now};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}    SIGNOTE PROTOCOL  --  Interactive Lifecycle Demo                {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}    Version 0.1.0  |  Ed25519 + keyed BLAKE2b-512                   {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!(
        "{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]=============================================================={RESET}"
    );
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!(
        "{CYAN}------------------------------------------------------------------------{RESET}"
    );
}

fn subsection(text: &str) {
    println!("{DIM}{CYAN}  >> {text}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn failure(text: &str) {
    println!("{RED}  [REJECTED] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.2} ms]{RESET}");
}

fn key_display(name: &str, key_hex: &str, color: &str) {
    let prefix = &key_hex[..8];
    let suffix = &key_hex[key_hex.len().saturating_sub(8)..];
    println!("  {color}{BOLD}{name}{RESET}  {DIM}{prefix}...{suffix}{RESET}");
}

fn report_row(report: &VerificationReport) {
    println!(
        "  {WHITE}{BOLD}valid{RESET}={GREEN}{}{RESET}  {WHITE}{BOLD}checkpoints{RESET}={YELLOW}{}{RESET}  {WHITE}{BOLD}custodian{RESET}={DIM}{}{RESET}",
        report.valid,
        report.confirmed_checkpoints,
        &report.custodian.to_hex()[..16],
    );
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Hand custody of a note from `signer` to `recipient`, stamped now.
fn transfer(note: &[u8], recipient: &NoteKeypair, signer: &NoteKeypair) -> Vec<u8> {
    append_checkpoint(
        note,
        &tai64n_now(),
        &random_nonce(),
        &recipient.public_key(),
        signer,
    )
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let demo_start = Instant::now();

    banner();

    // -----------------------------------------------------------------------
    // Step 1: Trust Root and Mint Charter
    // -----------------------------------------------------------------------

    section(1, "Trust Root and Mint Charter");
    subsection("Generating the currency's trust root and chartering a mint...");

    let t = Instant::now();
    let trust_root = NoteKeypair::generate();
    let mint = NoteKeypair::generate();
    let charter = trust_root.sign(&mint.public_key_bytes());
    timing("keygen + charter", t.elapsed());

    println!();
    key_display("Trust root", &trust_root.public_key().to_hex(), CYAN);
    key_display("Mint      ", &mint.public_key().to_hex(), MAGENTA);
    println!();
    success("Mint key chartered: trust root signed the mint's public key");

    // -----------------------------------------------------------------------
    // Step 2: Mint and Seal a Note
    // -----------------------------------------------------------------------

    section(2, "Minting: Build and Seal the Init Section");
    subsection("Assembling identity fields and stamping the keyed integrity seal...");

    let t = Instant::now();
    let sealed = InitSectionBuilder::new()
        .isocode(b"XTS")
        .serial_padded("TS001")
        .denomination(0, 10_000, 0)
        .mint_pk(&mint.public_key_bytes())
        .mint_pk_crsig(charter.as_bytes())
        .nonce(&random_nonce())
        .hashkey(b"Bill Gates never said that 640K ought to be enough for anybody!!")
        .build()
        .expect("demo note fields are valid")
        .seal();
    timing("build + seal", t.elapsed());

    let init = InitSection::parse(&sealed.bytes).expect("freshly sealed note parses");
    info("Currency", &init.isocode.to_string());
    info("Serial", &init.serial.to_string());
    info("Denomination", &init.denomination.to_string());
    info("Note size", &format!("{} bytes", sealed.bytes.len()));
    info("Seal digest", &format!("{}...", &sealed.digest_hex[..32]));
    success("Note sealed; every byte of its identity is now load-bearing");

    // -----------------------------------------------------------------------
    // Step 3: Verify the Fresh Note
    // -----------------------------------------------------------------------

    section(3, "Verification of the Fresh Note");
    subsection("Running the one-pass verifier against the trust root...");

    let t = Instant::now();
    let report = verify(&sealed.bytes, &trust_root.public_key()).expect("fresh note verifies");
    timing("verify", t.elapsed());

    report_row(&report);
    success("Framing, seal, and mint charter all check out; custody sits with the mint");

    // -----------------------------------------------------------------------
    // Step 4: Custody Transfers
    // -----------------------------------------------------------------------

    section(4, "Custody Transfers: Mint -> Alice -> Bob -> Merchant");
    subsection("Each holder appends a signed checkpoint naming the next custodian...");

    let alice = NoteKeypair::generate();
    let bob = NoteKeypair::generate();
    let merchant = NoteKeypair::generate();

    println!();
    key_display("Alice   ", &alice.public_key().to_hex(), BLUE);
    key_display("Bob     ", &bob.public_key().to_hex(), GREEN);
    key_display("Merchant", &merchant.public_key().to_hex(), MAGENTA);
    println!();

    let t = Instant::now();
    let mut note = transfer(&sealed.bytes, &alice, &mint);
    note = transfer(&note, &bob, &alice);
    note = transfer(&note, &merchant, &bob);
    timing("3 checkpoint appends", t.elapsed());

    info("Note size", &format!("{} bytes", note.len()));

    let t = Instant::now();
    let report = verify(&note, &trust_root.public_key()).expect("honest chain verifies");
    timing("verify full chain", t.elapsed());

    report_row(&report);
    success("Three checkpoints confirmed; the merchant now holds the note");

    // -----------------------------------------------------------------------
    // Step 5: A Tampering Attempt
    // -----------------------------------------------------------------------

    section(5, "Tampering: Rewriting the Denomination");
    subsection("An attacker bumps the face value in a copy of the note...");

    let mut forged = note.clone();
    forged[25] = 0xFF; // high byte of the denomination amount

    match verify(&forged, &trust_root.public_key()) {
        Ok(_) => unreachable!("forgery must not verify"),
        Err(err) => failure(&format!("{err}")),
    }
    success("The keyed seal caught the corruption before any signature was checked");

    subsection("The attacker tries forging a transfer to themselves instead...");

    let attacker = NoteKeypair::generate();
    let stolen = transfer(&note, &attacker, &attacker);

    match verify(&stolen, &trust_root.public_key()) {
        Ok(_) => unreachable!("theft must not verify"),
        Err(err) => failure(&format!("{err}")),
    }
    success("Only the merchant's key can sign the next checkpoint; the chain held");

    // -----------------------------------------------------------------------
    // Wrap-up
    // -----------------------------------------------------------------------

    println!();
    println!(
        "{CYAN}========================================================================{RESET}"
    );
    timing("total demo runtime", demo_start.elapsed());
    println!(
        "{BOLD}{GREEN}  SigNote lifecycle complete: minted, sealed, transferred, audited.{RESET}"
    );
    println!();
}
