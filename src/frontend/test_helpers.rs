use ::metrics::{Counter, CounterFn, Gauge, Histogram, Key, KeyName, Recorder, SharedString, Unit};
use anyhow::Result;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tempfile::TempDir;

use super::templates::{self, TemplateRegistry, TemplateSet};

pub const MINIMAL_LAYOUT: &str = "<html><head><title>{{ title }}</title></head>\
<body data-production=\"{{ production }}\" data-js=\"{{ include_js }}\">{{ body | safe }}</body></html>";

pub const MINIMAL_SEARCH: &str = "<ul>{% for backend in backends %}<li>{{ backend.id }}</li>{% endfor %}</ul>\
{% for repo in github_repos %}<a href=\"{{ repo.url }}\">{{ repo.name }}</a>{% endfor %}";

/// The template set shipped with the crate.
pub fn shipped_docroot() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("web")
}

/// Creates a docroot whose `templates/` holds the given files.
pub fn docroot_with(files: &[(&str, &str)]) -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    let templates = dir.path().join("templates");
    std::fs::create_dir(&templates)?;

    for (name, content) in files {
        std::fs::write(templates.join(name), content)?;
    }

    Ok(dir)
}

/// The shipped templates with the layout swapped for `layout`.
pub fn registry_with_layout(layout: &str) -> Result<TemplateRegistry> {
    let docroot = docroot_with(&[("layout.html", layout)])?;
    let shipped = shipped_docroot();

    Ok(TemplateRegistry {
        layout: TemplateSet::load(docroot.path(), templates::LAYOUT_FILES)?,
        search_page: TemplateSet::load(&shipped, templates::SEARCH_FILES)?,
        about_page: TemplateSet::load(&shipped, templates::ABOUT_FILES)?,
        opensearch_xml: TemplateSet::load(&shipped, templates::OPENSEARCH_FILES)?,
    })
}

type Counts = Arc<Mutex<HashMap<String, u64>>>;

fn counter_key(name: &str, template: &str) -> String {
    format!("{name}{{template={template}}}")
}

struct KeyCounter {
    key: String,
    counts: Counts,
}

impl CounterFn for KeyCounter {
    fn increment(&self, value: u64) {
        *self.counts.lock().unwrap().entry(self.key.clone()).or_default() += value;
    }

    fn absolute(&self, value: u64) {
        self.counts.lock().unwrap().insert(self.key.clone(), value);
    }
}

struct CountingRecorder {
    counts: Counts,
}

impl Recorder for CountingRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key) -> Counter {
        let template = key
            .labels()
            .find(|label| label.key() == "template")
            .map(|label| label.value().to_string())
            .unwrap_or_default();

        Counter::from_arc(Arc::new(KeyCounter {
            key: counter_key(key.name(), &template),
            counts: Arc::clone(&self.counts),
        }))
    }

    fn register_gauge(&self, _key: &Key) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _key: &Key) -> Histogram {
        Histogram::noop()
    }
}

static COUNTS: OnceLock<Counts> = OnceLock::new();

/// Installs a process-wide recorder (once) that keeps counter totals per template.
pub fn install_counting_recorder() {
    COUNTS.get_or_init(|| {
        let counts = Counts::default();
        let _ = ::metrics::set_boxed_recorder(Box::new(CountingRecorder {
            counts: Arc::clone(&counts),
        }));
        counts
    });
}

pub fn counter_value(name: &str, template: &str) -> u64 {
    COUNTS
        .get()
        .and_then(|counts| counts.lock().unwrap().get(&counter_key(name, template)).copied())
        .unwrap_or(0)
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with every log event, at any level, captured into the returned buffer.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogBuffer) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}
