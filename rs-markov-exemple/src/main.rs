use rs_markov_core::model::chain_model::ChainModel;
use rs_markov_core::model::generation_input::GenerationInput;
use rs_markov_core::source::{FileSource, MemorySource};

/// Small embedded corpus so the demo runs without any data file.
const CORPUS: [&str; 6] = [
    "The cat sat on the mat.",
    "The dog sat on the rug.",
    "The cat chased the dog.",
    "A bird watched the cat. A bird never sat.",
    "",
    "Why did the dog bark? Nobody knew.",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install the diagnostic sink; recoverable ingestion faults show up
    // here as warnings instead of aborting anything (RUST_LOG=warn)
    env_logger::init();

    // Build a model from the embedded corpus, line by line
    // Blank lines are a no-op, punctuation stays attached to its word
    let mut model = ChainModel::new();
    for line in CORPUS {
        model.ingest_line(line);
    }

    // The same thing works from any line source; a missing file is
    // reported and contributes nothing, the call never fails
    model.ingest_source(&mut FileSource::new("./data/corpus.txt"));

    // Sources can also be held in memory
    model.ingest_source(&mut MemorySource::new(["The mat stayed put."]));

    // Inspect the learned transition mapping (sorted, one key per line)
    println!("Transition mapping ({} keys):", model.key_count());
    print!("{model}");

    // Generate a few sentences with the default word cap
    let input = GenerationInput::default();
    println!("\nGenerated sentences:");
    for i in 0..10 {
        println!("{}: {}", i + 1, model.generate_sentence(&input));
    }

    // A tight cap truncates the walk instead of letting it run long;
    // the truncation is reported through the diagnostic sink
    let short = GenerationInput { max_words: 3 };
    println!("\nCapped at three words: {}", model.generate_sentence(&short));

    // A model with no sentence starts yields the empty string, not an error
    let empty = ChainModel::new();
    println!("Empty model generates: {:?}", empty.generate_sentence(&input));

    Ok(())
}
