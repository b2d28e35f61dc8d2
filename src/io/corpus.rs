//! Corpus discovery, loading, and persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::CorpusConfig;
use crate::error::{Error, Result};

use super::codec::{Decoder, Encoder, WavDecoder, WavEncoder};
use super::SampleBuffer;

/// File extensions treated as audio during directory expansion.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "flac", "ogg", "m4a", "aac", "wma", "aiff", "au", "amr",
];

/// A named collection of loaded sample buffers, keyed by file name.
pub struct Corpus {
    samples: BTreeMap<String, SampleBuffer>,
    decoder: Box<dyn Decoder>,
    encoder: Box<dyn Encoder>,
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new()
    }
}

impl Corpus {
    /// An empty corpus with the built-in WAV codec.
    pub fn new() -> Self {
        Self::with_codec(Box::new(WavDecoder), Box::new(WavEncoder))
    }

    /// An empty corpus with a caller-supplied codec (e.g. one that handles
    /// the compressed formats).
    pub fn with_codec(decoder: Box<dyn Decoder>, encoder: Box<dyn Encoder>) -> Self {
        Self {
            samples: BTreeMap::new(),
            decoder,
            encoder,
        }
    }

    /// Discover and load audio files.
    ///
    /// Include entries may be files or directories; directories expand to
    /// their audio files, descending when `config.recursive` is set.
    /// Exclude patterns are compiled up front, so a malformed pattern
    /// fails the whole call before any I/O. Unresolvable include entries
    /// are logged and skipped; a decode failure aborts the remaining
    /// batch but keeps everything already loaded.
    pub fn fetch(&mut self, config: &CorpusConfig) -> Result<()> {
        let exclude = compile_patterns(&config.exclude)?;

        let mut resolved: Vec<PathBuf> = Vec::new();
        for path in &config.include {
            if is_excluded(path, &exclude) {
                info!(path = %path.display(), "matched an exclude pattern, ignored");
                continue;
            }
            if path.is_dir() {
                resolved.extend(scan_directory(path, &exclude, config.recursive));
            } else if path.is_file() {
                resolved.push(path.clone());
            } else {
                warn!(path = %path.display(), "not a file or directory, skipping");
            }
        }

        if !config.append {
            self.samples.clear();
        }

        for file in resolved {
            let key = file_key(&file);
            if self.samples.contains_key(&key) {
                continue;
            }
            let buffer = self.decoder.decode(&file)?;
            info!(key = %key, samples = buffer.len(), sample_rate = buffer.sample_rate, "loaded");
            self.samples.insert(key, buffer);
        }
        Ok(())
    }

    /// Persist every buffer under its key-derived file name.
    ///
    /// With `in_place` the files land directly in `output_dir`
    /// (overwriting same-named originals); otherwise they go to an
    /// `output/` subdirectory, created on demand.
    pub fn write(&self, output_dir: &Path, in_place: bool) -> Result<()> {
        if !output_dir.is_dir() {
            return Err(Error::DirectoryNotFound(output_dir.to_path_buf()));
        }

        let target = if in_place {
            output_dir.to_path_buf()
        } else {
            let sub = output_dir.join("output");
            if !sub.is_dir() {
                std::fs::create_dir(&sub)?;
            }
            sub
        };

        for (key, buffer) in &self.samples {
            self.encoder.encode(&target.join(key), buffer)?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&SampleBuffer> {
        self.samples.get(key)
    }

    /// Insert or replace a buffer under `key`.
    pub fn insert(&mut self, key: String, buffer: SampleBuffer) {
        self.samples.insert(key, buffer);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn buffers(&self) -> impl Iterator<Item = (&str, &SampleBuffer)> {
        self.samples.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Log one line per entry: key, length, sample rate.
    pub fn summary(&self) {
        for (key, buffer) in &self.samples {
            info!(
                key = %key,
                samples = buffer.len(),
                sample_rate = buffer.sample_rate,
                duration_secs = buffer.duration_secs(),
            );
        }
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| Error::InvalidPattern {
                pattern: p.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Unanchored match anywhere in the path, like a regex `search`.
fn is_excluded(path: &Path, exclude: &[Regex]) -> bool {
    let text = path.to_string_lossy();
    exclude.iter().any(|re| re.is_match(&text))
}

fn scan_directory(dir: &Path, exclude: &[Regex], recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        // Pruning here skips an excluded directory's whole subtree
        // without descending into it.
        .filter_entry(|entry| !is_excluded(entry.path(), exclude))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| has_audio_extension(path))
        .collect()
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn file_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_extension_matching() {
        assert!(has_audio_extension(Path::new("a.wav")));
        assert!(has_audio_extension(Path::new("b.MP3")));
        assert!(has_audio_extension(Path::new("dir/c.flac")));
        assert!(!has_audio_extension(Path::new("notes.txt")));
        assert!(!has_audio_extension(Path::new("no_extension")));
    }

    #[test]
    fn test_file_key_is_file_name() {
        assert_eq!(file_key(Path::new("some/dir/a.wav")), "a.wav");
        assert_eq!(file_key(Path::new("a.wav")), "a.wav");
    }

    #[test]
    fn test_invalid_pattern_reported() {
        let err = compile_patterns(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { pattern, .. } if pattern == "["));
    }

    #[test]
    fn test_exclusion_is_substring_search() {
        let patterns = compile_patterns(&["skip_.*".to_string()]).unwrap();
        assert!(is_excluded(Path::new("data/skip_c.wav"), &patterns));
        assert!(!is_excluded(Path::new("data/a.wav"), &patterns));
    }
}
