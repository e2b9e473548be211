use clap::Parser;
use dom::{Document, DomPatch, KeySeq, NodeKey, text};
use hotkeys::ChordTracker;
use lexicon::Lexicon;
use mimalloc::MiMalloc;
use shred::{Banner, Session};
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Live reversible morpheme substitution over a sample document.
#[derive(Parser, Debug)]
#[command(name = "shredder")]
#[command(about = "Greedy dictionary substitution with live watch and restore")]
struct Args {
    /// Dictionary file: a JSON object of source -> replacement strings.
    #[arg(long, default_value = "demos/morphemes.json")]
    lexicon: PathBuf,
}

struct PageRefs {
    root: NodeKey,
    body: NodeKey,
    textarea: NodeKey,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let lexicon = match Lexicon::load(&args.lexicon) {
        Ok(lexicon) => lexicon,
        Err(err) => {
            log::error!("cannot initialize: {err}");
            std::process::exit(2);
        }
    };

    let mut doc = Document::new();
    let mut keys = KeySeq::new();
    let page = build_page(&mut doc, &mut keys);

    let mut session = Session::new(lexicon);
    let mut banner = Banner::new();
    let mut chord = ChordTracker::default();

    println!("-- initial document --");
    print!("{}", text::outline(&doc, page.root));

    // T+R toggles substitution on.
    press(&mut chord, &mut session, &mut banner, &mut doc, "t");
    press(&mut chord, &mut session, &mut banner, &mut doc, "r");
    chord.key_up("t");
    chord.key_up("r");
    println!();
    println!(
        "-- toggled on (banner: {}) --",
        banner.visible().unwrap_or("hidden")
    );
    print!("{}", text::outline(&doc, page.root));

    // Content inserted while active is picked up by the watcher.
    let late = insert_paragraph(&mut doc, &mut keys, page.body, "hello from the mutation watcher");
    println!();
    println!("-- inserted, not yet delivered: {:?} --", text::visible_text(&doc, late));
    session.deliver_pending(&mut doc);
    println!("-- after delivery: {:?} --", text::visible_text(&doc, late));
    print!("{}", text::outline(&doc, page.root));

    // With focus inside the textarea the chord never fires.
    doc.set_focus(Some(page.textarea));
    press(&mut chord, &mut session, &mut banner, &mut doc, "t");
    press(&mut chord, &mut session, &mut banner, &mut doc, "r");
    chord.key_up("t");
    chord.key_up("r");
    chord.reset();
    doc.set_focus(None);
    println!();
    println!(
        "-- chord while typing: still {} --",
        if session.is_active() { "active" } else { "inactive" }
    );

    // T+R again restores every original, inserted content included.
    press(&mut chord, &mut session, &mut banner, &mut doc, "t");
    press(&mut chord, &mut session, &mut banner, &mut doc, "r");
    println!();
    println!(
        "-- toggled off (banner: {}) --",
        banner.visible().unwrap_or("hidden")
    );
    print!("{}", text::outline(&doc, page.root));
}

/// Route one key press: swallowed while an editing context has focus,
/// otherwise fed to the chord, toggling the session on completion.
fn press(
    chord: &mut ChordTracker,
    session: &mut Session,
    banner: &mut Banner,
    doc: &mut Document,
    key: &str,
) {
    if dom::is_editing_context(doc) {
        return;
    }
    if chord.key_down(key) {
        if session.toggle(doc) {
            banner.on_start();
        } else {
            banner.on_stop();
        }
    }
}

fn build_page(doc: &mut Document, keys: &mut KeySeq) -> PageRefs {
    let root = keys.next_key();
    let body = keys.next_key();
    let heading = keys.next_key();
    let heading_text = keys.next_key();
    let intro = keys.next_key();
    let intro_text = keys.next_key();
    let prose = keys.next_key();
    let prose_text = keys.next_key();
    let em = keys.next_key();
    let em_text = keys.next_key();
    let script = keys.next_key();
    let script_text = keys.next_key();
    let textarea = keys.next_key();
    let textarea_text = keys.next_key();

    doc.apply(&[
        DomPatch::CreateDocument {
            key: root,
            doctype: Some("html".to_string()),
        },
        DomPatch::CreateElement {
            key: body,
            name: "body".into(),
            attributes: Vec::new(),
        },
        DomPatch::CreateElement {
            key: heading,
            name: "h1".into(),
            attributes: Vec::new(),
        },
        DomPatch::CreateText {
            key: heading_text,
            text: "hello, shredder".into(),
        },
        DomPatch::CreateElement {
            key: intro,
            name: "p".into(),
            attributes: Vec::new(),
        },
        DomPatch::CreateText {
            key: intro_text,
            text: "heLLo world, LO!".into(),
        },
        DomPatch::CreateElement {
            key: prose,
            name: "p".into(),
            attributes: Vec::new(),
        },
        DomPatch::CreateText {
            key: prose_text,
            text: "the balloon ".into(),
        },
        DomPatch::CreateElement {
            key: em,
            name: "em".into(),
            attributes: Vec::new(),
        },
        DomPatch::CreateText {
            key: em_text,
            text: "flows away".into(),
        },
        DomPatch::CreateElement {
            key: script,
            name: "script".into(),
            attributes: vec![("type".into(), Some("text/javascript".into()))],
        },
        DomPatch::CreateText {
            key: script_text,
            text: "console.log('hello')".into(),
        },
        DomPatch::CreateElement {
            key: textarea,
            name: "textarea".into(),
            attributes: Vec::new(),
        },
        DomPatch::CreateText {
            key: textarea_text,
            text: "type hello here".into(),
        },
        DomPatch::AppendChild {
            parent: root,
            child: body,
        },
        DomPatch::AppendChild {
            parent: body,
            child: heading,
        },
        DomPatch::AppendChild {
            parent: heading,
            child: heading_text,
        },
        DomPatch::AppendChild {
            parent: body,
            child: intro,
        },
        DomPatch::AppendChild {
            parent: intro,
            child: intro_text,
        },
        DomPatch::AppendChild {
            parent: body,
            child: prose,
        },
        DomPatch::AppendChild {
            parent: prose,
            child: prose_text,
        },
        DomPatch::AppendChild {
            parent: prose,
            child: em,
        },
        DomPatch::AppendChild {
            parent: em,
            child: em_text,
        },
        DomPatch::AppendChild {
            parent: body,
            child: script,
        },
        DomPatch::AppendChild {
            parent: script,
            child: script_text,
        },
        DomPatch::AppendChild {
            parent: body,
            child: textarea,
        },
        DomPatch::AppendChild {
            parent: textarea,
            child: textarea_text,
        },
    ])
    .expect("demo page should apply");

    PageRefs {
        root,
        body,
        textarea,
    }
}

fn insert_paragraph(
    doc: &mut Document,
    keys: &mut KeySeq,
    body: NodeKey,
    content: &str,
) -> NodeKey {
    let p = keys.next_key();
    let t = keys.next_key();
    doc.apply(&[
        DomPatch::CreateElement {
            key: p,
            name: "p".into(),
            attributes: Vec::new(),
        },
        DomPatch::CreateText {
            key: t,
            text: content.into(),
        },
        DomPatch::AppendChild {
            parent: body,
            child: p,
        },
        DomPatch::AppendChild { parent: p, child: t },
    ])
    .expect("live paragraph should apply");
    p
}
