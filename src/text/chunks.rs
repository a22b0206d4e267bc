//! Splitting long text into translation-sized chunks.

/// Default maximum chunk size in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 800;

/// Split text after sentence terminators (`.`, `!`, `?`) followed by
/// whitespace. The whitespace run is dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(ws_start, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }

        sentences.push(&text[start..ws_start]);

        let mut resume = text.len();
        while let Some(&(j, w)) = chars.peek() {
            if w.is_whitespace() {
                chars.next();
            } else {
                resume = j;
                break;
            }
        }
        start = resume;
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// Split text into chunks of at most `chunk_size` bytes.
///
/// Sentences are packed greedily. A sentence longer than `chunk_size` is
/// broken on whitespace instead. Returned chunks are trimmed and non-empty.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    if text.trim().is_empty() {
        return chunks;
    }

    let mut current = String::new();

    for sentence in split_sentences(text) {
        if sentence.len() > chunk_size {
            // Flush what we have, then pack this sentence word by word
            push_trimmed(&mut chunks, &current);
            current.clear();

            let mut piece = String::new();
            for word in sentence.split_whitespace() {
                if !piece.is_empty() && piece.len() + word.len() + 1 > chunk_size {
                    push_trimmed(&mut chunks, &piece);
                    piece.clear();
                }
                piece.push_str(word);
                piece.push(' ');
            }
            current = piece;
        } else if !current.is_empty() && current.len() + sentence.len() > chunk_size {
            push_trimmed(&mut chunks, &current);
            current.clear();
            current.push_str(sentence);
            current.push(' ');
        } else {
            current.push_str(sentence);
            current.push(' ');
        }
    }

    push_trimmed(&mut chunks, &current);
    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
