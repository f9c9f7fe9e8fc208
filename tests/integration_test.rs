use question_copy::dom::{Document, DocumentBuilder, NodeId, Viewport};
use question_copy::infrastructure::{load_snapshot_file, save_snapshot_file};
use question_copy::services::root_selector::{find_candidates, select_root, CandidateTier};
use question_copy::workflow::{build_output, extract};
use question_copy::{CopySession, CopyStatus, SnapshotSource};
use std::path::{Path, PathBuf};

fn viewport() -> Viewport {
    Viewport {
        width: 1000.0,
        height: 800.0,
    }
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// 一道普通选择题：题号 + 题干 + 若干选项
fn add_question(
    b: &mut DocumentBuilder,
    parent: NodeId,
    y: f64,
    number: &str,
    stem: &str,
    options: &[&str],
) -> NodeId {
    let widget = b
        .element(parent, "div")
        .class("lrn_widget")
        .class("lrn_question")
        .rect(0.0, y, 900.0, 400.0)
        .id();
    b.element(widget, "span")
        .attr("data-cy", "question-number")
        .rect(0.0, y, 20.0, 20.0)
        .text(number);
    let content = b
        .element(widget, "div")
        .class("lrn_stimulus_content")
        .rect(0.0, y + 30.0, 800.0, 40.0)
        .id();
    b.element(content, "p").text(stem);
    for (i, option) in options.iter().enumerate() {
        b.element(widget, "div")
            .class("lrn-mcq-option")
            .rect(0.0, y + 100.0 + i as f64 * 40.0, 800.0, 30.0)
            .text(option);
    }
    widget
}

#[test]
fn test_basic_question_output() {
    let mut b = DocumentBuilder::new(viewport());
    let root = b.root();
    add_question(&mut b, root, 0.0, "3", "What is 2+2?", &["3", "4", "5"]);
    let doc = b.build();

    assert_eq!(
        build_output(&doc),
        "Question 3\n\nWhat is 2+2?\n\nA. 3\nB. 4\nC. 5"
    );
}

#[test]
fn test_empty_page_output() {
    let doc = DocumentBuilder::new(viewport()).build();
    assert_eq!(
        build_output(&doc),
        "Question ?\n\n[No question stimulus found]\n\n[No options found]"
    );
}

#[test]
fn test_visible_widget_wins_over_offscreen() {
    let mut b = DocumentBuilder::new(viewport());
    let root = b.root();
    // 第一题已经滚出视口
    add_question(&mut b, root, -2000.0, "1", "First question", &["a", "b"]);
    add_question(&mut b, root, 100.0, "2", "Second question", &["c", "d"]);
    let doc = b.build();

    let result = extract(&doc);
    assert_eq!(result.question_number, "2");
    assert_eq!(result.stimulus, "Second question");
    assert_eq!(result.options.len(), 2);
    assert_eq!(result.options[1].text, "d");
}

#[test]
fn test_falls_back_to_document_root() {
    let mut b = DocumentBuilder::new(viewport());
    let root = b.root();
    b.element(root, "div")
        .class("lrn_stimulus_content")
        .rect(0.0, 0.0, 500.0, 40.0)
        .text("Loose stem");
    let doc = b.build();

    let (tier, candidates) = find_candidates(&doc);
    assert_eq!(tier, CandidateTier::DocumentRoot);
    assert_eq!(candidates, vec![root]);
    assert_eq!(select_root(&doc).node, root);
    assert_eq!(
        build_output(&doc),
        "Question ?\n\nLoose stem\n\n[No options found]"
    );
}

#[test]
fn test_math_label_in_stimulus() {
    let mut b = DocumentBuilder::new(viewport());
    let root = b.root();
    let widget = b
        .element(root, "div")
        .class("lrn_question")
        .rect(0.0, 0.0, 900.0, 300.0)
        .id();
    let content = b
        .element(widget, "div")
        .class("lrn_stimulus_content")
        .text("Simplify ")
        .id();
    let wrapper = b.element(content, "span").class("math_expression").id();
    let container = b
        .element(wrapper, "mjx-container")
        .attr("aria-label", "x squared")
        .id();
    b.element(container, "mjx-math")
        .attr("aria-label", "math")
        .text("x2");
    let doc = b.build();

    assert_eq!(
        build_output(&doc),
        "Question ?\n\nSimplify x squared\n\n[No options found]"
    );
}

#[test]
fn test_snapshot_fixture_two_columns() {
    let snapshot = tokio_test::block_on(load_snapshot_file(fixture("two_column.json")))
        .expect("读取快照失败");
    let doc = Document::from_snapshot(&snapshot).expect("快照结构非法");

    assert_eq!(
        build_output(&doc),
        "Question 12\n\nThe cat sat on the mat.\n\nThe dog sat on the log.\n\n\
         Which line rhymes with a cat?\n\nA. The cat sat\nB. on the mat"
    );
}

#[test]
fn test_session_replays_saved_snapshot() {
    let snapshot = tokio_test::block_on(load_snapshot_file(fixture("two_column.json"))).unwrap();
    let copy_path = std::env::temp_dir().join(format!(
        "question_copy_replay_{}.json",
        std::process::id()
    ));
    tokio_test::block_on(save_snapshot_file(&copy_path, &snapshot)).unwrap();

    let mut session = CopySession::new(SnapshotSource::File(copy_path.clone()));
    let (text, status) = tokio_test::block_on(session.copy()).unwrap();
    let _ = std::fs::remove_file(&copy_path);

    assert_eq!(status, CopyStatus::Changed);
    assert!(text.starts_with("Question 12\n\n"));
    assert!(text.ends_with("A. The cat sat\nB. on the mat"));
}

#[tokio::test]
#[ignore] // 需要本机浏览器开启调试端口：cargo test -- --ignored
async fn test_live_page_copy() {
    use question_copy::infrastructure::JsExecutor;
    use question_copy::{connect_to_browser_and_page, Config};

    let config = Config::from_env().expect("配置错误");
    let (_browser, page) = connect_to_browser_and_page(
        config.browser_debug_port,
        config.target_url.as_deref(),
        config.target_title.as_deref(),
    )
    .await
    .expect("连接浏览器失败");

    let mut session = CopySession::new(SnapshotSource::Live(JsExecutor::new(page)));
    let text = session.preview().await.expect("提取失败");

    assert!(text.starts_with("Question "), "输出应以题号行开头");
}
