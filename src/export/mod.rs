mod writer;

pub use writer::{render_json, render_txt, render_xml, CorpusWriter};
