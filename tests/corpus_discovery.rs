//! Discovery, loading, and persistence behavior of the corpus loader.

use std::fs;
use std::path::Path;

use audiomorph::io::{Decoder, Encoder, WavDecoder, WavEncoder};
use audiomorph::{Corpus, CorpusConfig, Error, SampleBuffer};
use tempfile::tempdir;

/// Hands out a fixed tiny buffer for any path, so discovery tests can use
/// fixture files with arbitrary contents (including fake mp3s).
struct StubDecoder;

impl Decoder for StubDecoder {
    fn decode(&self, _path: &Path) -> audiomorph::Result<SampleBuffer> {
        Ok(SampleBuffer::new(vec![0.1, -0.1, 0.2], 16_000))
    }
}

fn stub_corpus() -> Corpus {
    Corpus::with_codec(Box::new(StubDecoder), Box::new(WavEncoder))
}

fn touch(path: &Path) {
    fs::write(path, b"fixture").unwrap();
}

fn fixture_wav(path: &Path, value: f64, len: usize) {
    let buffer = SampleBuffer::new(vec![value; len], 22_050);
    WavEncoder.encode(path, &buffer).unwrap();
}

fn keys(corpus: &Corpus) -> Vec<String> {
    corpus.keys().map(str::to_owned).collect()
}

#[test]
fn exclude_pattern_filters_discovery() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.wav"));
    touch(&dir.path().join("b.mp3"));
    touch(&dir.path().join("skip_c.wav"));

    let mut corpus = stub_corpus();
    corpus
        .fetch(&CorpusConfig {
            include: vec![dir.path().to_path_buf()],
            exclude: vec!["skip_.*".to_string()],
            ..CorpusConfig::default()
        })
        .unwrap();

    assert_eq!(keys(&corpus), ["a.wav", "b.mp3"]);
}

#[test]
fn non_audio_files_ignored_in_directories() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.wav"));
    touch(&dir.path().join("readme.txt"));

    let mut corpus = stub_corpus();
    corpus
        .fetch(&CorpusConfig {
            include: vec![dir.path().to_path_buf()],
            ..CorpusConfig::default()
        })
        .unwrap();

    assert_eq!(keys(&corpus), ["a.wav"]);
}

#[test]
fn recursion_flag_controls_descent() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("top.wav"));
    fs::create_dir(dir.path().join("sub")).unwrap();
    touch(&dir.path().join("sub").join("nested.wav"));

    let mut corpus = stub_corpus();
    corpus
        .fetch(&CorpusConfig {
            include: vec![dir.path().to_path_buf()],
            recursive: false,
            ..CorpusConfig::default()
        })
        .unwrap();
    assert_eq!(keys(&corpus), ["top.wav"]);

    let mut corpus = stub_corpus();
    corpus
        .fetch(&CorpusConfig {
            include: vec![dir.path().to_path_buf()],
            recursive: true,
            ..CorpusConfig::default()
        })
        .unwrap();
    assert_eq!(keys(&corpus), ["nested.wav", "top.wav"]);
}

#[test]
fn excluded_directory_subtree_is_pruned() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("keep.wav"));
    fs::create_dir(dir.path().join("junk")).unwrap();
    touch(&dir.path().join("junk").join("inside.wav"));

    let mut corpus = stub_corpus();
    corpus
        .fetch(&CorpusConfig {
            include: vec![dir.path().to_path_buf()],
            exclude: vec!["junk".to_string()],
            recursive: true,
            ..CorpusConfig::default()
        })
        .unwrap();

    assert_eq!(keys(&corpus), ["keep.wav"]);
}

#[test]
fn invalid_pattern_fails_before_any_loading() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.wav"));

    let mut corpus = stub_corpus();
    let err = corpus
        .fetch(&CorpusConfig {
            include: vec![dir.path().to_path_buf()],
            exclude: vec!["[".to_string()],
            ..CorpusConfig::default()
        })
        .unwrap_err();

    assert!(matches!(err, Error::InvalidPattern { pattern, .. } if pattern == "["));
    assert!(corpus.is_empty());
}

#[test]
fn append_merges_and_replace_clears() {
    let dir_a = tempdir().unwrap();
    touch(&dir_a.path().join("a.wav"));
    let dir_b = tempdir().unwrap();
    touch(&dir_b.path().join("b.wav"));

    let mut corpus = stub_corpus();
    corpus
        .fetch(&CorpusConfig {
            include: vec![dir_a.path().to_path_buf()],
            ..CorpusConfig::default()
        })
        .unwrap();
    corpus
        .fetch(&CorpusConfig {
            include: vec![dir_b.path().to_path_buf()],
            append: true,
            ..CorpusConfig::default()
        })
        .unwrap();
    assert_eq!(keys(&corpus), ["a.wav", "b.wav"]);

    corpus
        .fetch(&CorpusConfig {
            include: vec![dir_b.path().to_path_buf()],
            append: false,
            ..CorpusConfig::default()
        })
        .unwrap();
    assert_eq!(keys(&corpus), ["b.wav"]);
}

#[test]
fn unresolvable_include_is_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real.wav");
    touch(&real);

    let mut corpus = stub_corpus();
    corpus
        .fetch(&CorpusConfig {
            include: vec![dir.path().join("does_not_exist.wav"), real],
            ..CorpusConfig::default()
        })
        .unwrap();

    assert_eq!(keys(&corpus), ["real.wav"]);
}

#[test]
fn decode_failure_aborts_batch_but_keeps_partial() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.wav");
    fixture_wav(&good, 0.25, 64);
    let bad = dir.path().join("bad.wav");
    fs::write(&bad, b"not a wav file").unwrap();

    let mut corpus = Corpus::new();
    let err = corpus
        .fetch(&CorpusConfig {
            // Explicit file includes load in order: good first, then bad.
            include: vec![good, bad.clone()],
            ..CorpusConfig::default()
        })
        .unwrap_err();

    assert!(matches!(err, Error::DecodeFailure { path, .. } if path == bad));
    assert_eq!(keys(&corpus), ["good.wav"]);
}

#[test]
fn write_uses_output_subdirectory_by_default() {
    let src = tempdir().unwrap();
    touch(&src.path().join("a.wav"));
    let mut corpus = stub_corpus();
    corpus
        .fetch(&CorpusConfig {
            include: vec![src.path().to_path_buf()],
            ..CorpusConfig::default()
        })
        .unwrap();

    let out = tempdir().unwrap();
    corpus.write(out.path(), false).unwrap();
    assert!(out.path().join("output").join("a.wav").is_file());

    corpus.write(out.path(), true).unwrap();
    assert!(out.path().join("a.wav").is_file());
}

#[test]
fn write_to_missing_directory_fails() {
    let corpus = stub_corpus();
    let out = tempdir().unwrap();
    let missing = out.path().join("nope");

    assert!(matches!(
        corpus.write(&missing, false),
        Err(Error::DirectoryNotFound(p)) if p == missing
    ));
}

#[test]
fn wav_roundtrip_preserves_samples() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tone.wav");

    let original = SampleBuffer::new(
        (0..512).map(|i| (i as f64 * 0.05).sin() * 0.7).collect(),
        44_100,
    );
    WavEncoder.encode(&path, &original).unwrap();
    let decoded = WavDecoder.decode(&path).unwrap();

    assert_eq!(decoded.sample_rate, 44_100);
    assert_eq!(decoded.len(), 512);
    for (a, b) in original.samples.iter().zip(decoded.samples.iter()) {
        // Storage is 32-bit float.
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn duplicate_keys_are_loaded_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.wav");
    fixture_wav(&path, 0.5, 32);

    let mut corpus = Corpus::new();
    corpus
        .fetch(&CorpusConfig {
            include: vec![path.clone(), path],
            ..CorpusConfig::default()
        })
        .unwrap();

    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.get("a.wav").unwrap().len(), 32);
}
