//! End-to-end tests for a full documentation run

use std::fs;
use std::path::{Path, PathBuf};

use docflow_core::{Config, Declaration, DeclarationType, DocflowError, Pipeline, RunLog, RunReport};
use tempfile::TempDir;
use tracing::Level;

const TEMPLATE: &str = "{% for doc in docs %}<h2>{{ doc.name }}</h2>\
{% if doc.path %}<code>{{ doc.path }}</code>{% endif %}\
{% if doc.doc %}<p>{{ doc.doc }}</p>{% endif %}\n{% endfor %}";

const CURRENCY: &str = include_str!("fixtures/currency.py");

/// A scratch workspace with `src/`, `templates/` and `out/` directories
struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("src")).unwrap();
        fs::create_dir(root.path().join("templates")).unwrap();
        fs::write(
            root.path().join("templates").join("api_doc_template.html"),
            TEMPLATE,
        )
        .unwrap();
        Self { root }
    }

    fn source(&self, name: &str, text: &str) -> &Self {
        fs::write(self.root.path().join("src").join(name), text).unwrap();
        self
    }

    fn config(&self) -> Config {
        Config {
            source_dir: self.root.path().join("src"),
            template_dir: self.root.path().join("templates"),
            output_dir: self.root.path().join("out"),
            ..Config::default()
        }
    }

    fn out(&self) -> PathBuf {
        self.root.path().join("out")
    }

    fn text_output(&self) -> String {
        fs::read_to_string(self.out().join("api_docs.txt")).unwrap()
    }
}

fn run(config: &Config) -> (Result<RunReport, DocflowError>, RunLog) {
    let mut log = RunLog::new();
    let report = Pipeline::run(config, &mut log);
    (report, log)
}

fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).map_or(0, |entries| entries.count())
}

fn extract(config: &Config) -> Vec<Declaration> {
    Pipeline::extract(config, &mut RunLog::new())
}

#[test]
fn empty_source_directory_writes_nothing() {
    let ws = Workspace::new();
    ws.source("README.md", "not python");

    let (report, log) = run(&ws.config());
    assert!(matches!(report, Ok(RunReport::NothingToDocument)));
    let warnings: Vec<_> = log.messages(Level::WARN).collect();
    assert_eq!(warnings, vec!["No code found for documentation."]);
    assert_eq!(log.records().len(), 1);
    assert_eq!(file_count(&ws.out()), 0);
}

#[test]
fn files_without_declarations_count_as_empty() {
    let ws = Workspace::new();
    ws.source("constants.py", "RATE = 1.5\n");
    let (report, _) = run(&ws.config());
    assert!(matches!(report, Ok(RunReport::NothingToDocument)));
}

#[test]
fn broken_sibling_does_not_affect_valid_files() {
    let ws = Workspace::new();
    ws.source("a_valid.py", "def first():\n    '''One.'''\n    return 1\n")
        .source("c_valid.py", "class Third:\n    pass\n");
    let baseline = extract(&ws.config());

    ws.source("b_broken.py", "def broken(:\n    pass\n");
    let mut log = RunLog::new();
    let with_broken = Pipeline::extract(&ws.config(), &mut log);

    assert_eq!(baseline, with_broken);
    assert_eq!(with_broken.len(), 2);
    let errors: Vec<_> = log.messages(Level::ERROR).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Syntax error in b_broken.py"));
}

#[test]
fn route_and_plain_function_tags() {
    let ws = Workspace::new();
    ws.source(
        "app.py",
        "@app.route(\"/rates\")\ndef rates():\n    pass\n\ndef helper():\n    pass\n",
    );
    let decls = extract(&ws.config());
    assert_eq!(decls[0].declaration_type(), DeclarationType::FlaskRoute);
    assert_eq!(decls[0].route_path.as_deref(), Some("/rates"));
    assert_eq!(decls[1].declaration_type(), DeclarationType::Function);
    assert_eq!(decls[1].route_path, None);
}

#[test]
fn web_marker_takes_priority_in_report() {
    let ws = Workspace::new();
    ws.source(
        "server.py",
        "def make_app():\n    app = Flask(__name__)\n    requests.get(API_URL)\n    return app\n",
    );
    let (report, _) = run(&ws.config());
    assert!(report.unwrap().is_complete());
    assert!(ws.text_output().contains(
        "  This code defines a Flask web server exposing an endpoint for currency conversion."
    ));
}

#[test]
fn reruns_are_byte_identical() {
    let ws = Workspace::new();
    ws.source("z.py", "class Z:\n    pass\n")
        .source("a.py", "def a():\n    pass\n")
        .source("m.py", "@app.route('/m')\ndef m():\n    '''M.'''\n");

    run(&ws.config()).0.unwrap();
    let first = ws.text_output();
    let first_html = fs::read(ws.out().join("api_docs.html")).unwrap();
    run(&ws.config()).0.unwrap();
    assert_eq!(first, ws.text_output());
    assert_eq!(first_html, fs::read(ws.out().join("api_docs.html")).unwrap());

    // Files are reported in name order
    let a = first.find("Name: a\n").unwrap();
    let m = first.find("Name: m\n").unwrap();
    let z = first.find("Name: Z\n").unwrap();
    assert!(a < m && m < z);
}

#[test]
fn convert_currency_scenario() {
    let ws = Workspace::new();
    ws.source(
        "service.py",
        r#"@app.route("/")
def convert_currency(amount):
    "Converts currency."
    return amount

class Unused: pass
"#,
    );

    let (report, log) = run(&ws.config());
    match report.unwrap() {
        RunReport::Rendered {
            declarations,
            html,
            text,
        } => {
            assert_eq!(declarations, 2);
            assert!(html.is_ok());
            assert_eq!(text.unwrap(), ws.out().join("api_docs.txt"));
        }
        RunReport::NothingToDocument => panic!("expected rendered report"),
    }

    let infos: Vec<_> = log.messages(Level::INFO).collect();
    assert_eq!(infos.len(), 3);
    assert_eq!(infos[0], "HTML documentation generated.");
    assert_eq!(infos[1], "Plain English documentation generated.");

    let text = ws.text_output();
    let (convert, unused) = text.split_once("Name: Unused").unwrap();
    assert!(convert.contains("Name: convert_currency\nLocation: service.py\nAPI Endpoint: /\nType: flask_route\n"));
    assert!(convert.contains("Docstring:\n  - Converts currency.\n"));
    assert!(unused.contains("Type: class\n"));
    assert!(!unused.contains("API Endpoint"));
    assert!(unused.contains("  - Structuring code and implementing reusable components."));
    assert!(text.ends_with(&"-".repeat(40)));

    let html = fs::read_to_string(ws.out().join("api_docs.html")).unwrap();
    assert!(html.contains("<h2>convert_currency</h2>"));
    assert!(html.contains("<p>Converts currency.</p>"));
    assert!(html.contains("<h2>Unused</h2>"));
}

#[test]
fn missing_template_directory_is_fatal() {
    let ws = Workspace::new();
    ws.source("app.py", "def f():\n    pass\n");
    let mut config = ws.config();
    config.template_dir = ws.root.path().join("no-templates");

    let (report, log) = run(&config);
    let err = report.unwrap_err();
    assert!(matches!(err, DocflowError::Precondition { what: "Template directory", .. }));
    assert_eq!(log.records().len(), 1);
    assert_eq!(log.records()[0].level, Level::ERROR);
    assert!(log.records()[0].message.starts_with("Template directory '"));
    assert!(!ws.out().exists());
}

#[test]
fn missing_source_directory_is_checked_first() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.source_dir = ws.root.path().join("absent");
    config.template_dir = ws.root.path().join("also-absent");

    let (report, log) = run(&config);
    assert!(matches!(
        report,
        Err(DocflowError::Precondition { what: "Source directory", .. })
    ));
    assert_eq!(log.count(Level::ERROR), 1);
}

#[test]
fn missing_template_file_still_writes_text() {
    let ws = Workspace::new();
    ws.source("app.py", "def f():\n    pass\n");
    let mut config = ws.config();
    config.template_name = "missing.html".to_string();

    let (report, log) = run(&config);
    match report.unwrap() {
        RunReport::Rendered { html, text, .. } => {
            assert!(matches!(html, Err(DocflowError::Template { .. })));
            assert!(text.is_ok());
        }
        RunReport::NothingToDocument => panic!("expected rendered report"),
    }
    assert!(!ws.out().join("api_docs.html").exists());
    assert!(ws.out().join("api_docs.txt").exists());
    let errors: Vec<_> = log.messages(Level::ERROR).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("HTML documentation failed"));
}

#[test]
fn text_failure_still_writes_html() {
    let ws = Workspace::new();
    ws.source("app.py", "def f():\n    pass\n");
    // A directory in the way makes the text write fail
    fs::create_dir_all(ws.out().join("api_docs.txt")).unwrap();

    let (report, log) = run(&ws.config());
    match report.unwrap() {
        RunReport::Rendered { html, text, .. } => {
            assert!(html.is_ok());
            assert!(matches!(text, Err(DocflowError::Write { .. })));
        }
        RunReport::NothingToDocument => panic!("expected rendered report"),
    }
    assert!(ws.out().join("api_docs.html").is_file());
    let errors: Vec<_> = log.messages(Level::ERROR).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Plain English documentation failed"));
}

#[test]
fn deeply_nested_file_is_skipped() {
    let ws = Workspace::new();
    let depth = 1000;
    let nested = format!("x = {}1{}\n", "(".repeat(depth), ")".repeat(depth));
    ws.source("a_nested.py", &nested)
        .source("b_valid.py", "def survivor():\n    pass\n");

    let mut log = RunLog::new();
    let decls = Pipeline::extract(&ws.config(), &mut log);
    let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["survivor"]);
    let errors: Vec<_> = log.messages(Level::ERROR).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Syntax error in a_nested.py"));
    assert!(errors[0].contains("too many nested expressions"));
}

#[test]
fn recent_python_syntax_is_documented() {
    let ws = Workspace::new();
    ws.source(
        "generics.py",
        "type Pair = tuple[int, int]\n\ndef first[T](items: list[T]) -> T:\n    \"\"\"First item.\"\"\"\n    return items[0]\n\nasync def fetch():\n    pass\n",
    );

    let mut log = RunLog::new();
    let decls = Pipeline::extract(&ws.config(), &mut log);
    assert_eq!(log.count(Level::ERROR), 0);
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].name, "first");
    assert_eq!(decls[0].docstring.as_deref(), Some("First item."));
    assert_eq!(decls[0].declaration_type(), DeclarationType::Function);
}

#[test]
fn sample_currency_service() {
    let ws = Workspace::new();
    ws.source("currency.py", CURRENCY);

    let decls = extract(&ws.config());
    assert_eq!(decls.len(), 1);
    let convert = &decls[0];
    assert_eq!(convert.name, "convert_currency");
    assert_eq!(convert.route_path.as_deref(), Some("/"));
    assert_eq!(convert.docstring, None);
    assert!(convert.source_text.starts_with("def convert_currency():"));
    assert!(convert
        .source_text
        .ends_with("return render_template_string(HTML_FORM)"));

    run(&ws.config()).0.unwrap();
    let text = ws.text_output();
    assert!(text.contains("API Endpoint: /\n"));
    assert!(!text.contains("Docstring:"));
    // The route body calls `requests` and catches exceptions, but never names the framework
    assert!(text.contains("  This function/module integrates a third-party API"));
    assert!(text.contains("  This module uses try/except blocks"));
}
