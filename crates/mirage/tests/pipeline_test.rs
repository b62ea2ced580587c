//! End-to-end tests over the facade pipeline and assembler.

use mirage::{
    DetectiveProfile, GeneratedStory, MarkdownAssembler, MirageConfig, StoryAssembler,
    StoryPhase, StoryPipeline, harrowgate,
};

fn config() -> MirageConfig {
    let mut config = MirageConfig::default();
    config.generation.min_plot_points = 4;
    config.generation.max_plot_points = 12;
    config.seed = 11;
    config
}

async fn generate() -> GeneratedStory {
    let pipeline = StoryPipeline::new(config());
    pipeline
        .generate(harrowgate().expect("sample scenario"), DetectiveProfile::default())
        .await
        .expect("story generates")
}

#[tokio::test]
async fn test_sample_scenario_is_valid() {
    let scenario = harrowgate().expect("sample scenario parses and validates");
    assert_eq!(scenario.crime.criminal.name, "Celia Harrow");
    assert_eq!(scenario.paths.len(), 3);
}

#[tokio::test]
async fn test_pipeline_generates_a_complete_story() {
    let story = generate().await;

    assert_eq!(*story.state().phase(), StoryPhase::Done);
    assert!(story.plot_points().len() <= 13);
    for (index, point) in story.plot_points().iter().enumerate() {
        assert_eq!(*point.sequence(), index as u32 + 1);
        assert!((1..=10).contains(point.suspense()));
    }
    let resolution = story.plot_points().last().expect("at least one point");
    assert!(!resolution.collision());
    assert!(resolution.reveal().is_some());
}

#[tokio::test]
async fn test_detective_layer_never_names_the_criminal() {
    let story = generate().await;

    // The detective's accumulated knowledge comes from the fabricated
    // layer only; the real criminal's name must never cross the gap.
    for point in story.plot_points() {
        if let Some(learns) = point.detective_learns() {
            assert!(
                !learns.contains("Celia"),
                "detective learned the real criminal: {}",
                learns
            );
        }
    }
    for fact in story.state().detective_knowledge() {
        assert!(!fact.contains("Celia"), "knowledge leaked: {}", fact);
    }
}

#[tokio::test]
async fn test_batch_stories_are_independent() {
    let pipeline = StoryPipeline::new(config());
    let results = pipeline
        .generate_batch(harrowgate().expect("sample scenario"), 3)
        .await;

    assert_eq!(results.len(), 3);
    for result in &results {
        let story = result.as_ref().expect("batch story generates");
        assert_eq!(*story.state().phase(), StoryPhase::Done);
    }
}

#[tokio::test]
async fn test_markdown_transcript_separates_the_layers() {
    let scenario = harrowgate().expect("sample scenario");
    let story = generate().await;

    let transcript = MarkdownAssembler::new()
        .assemble(&scenario, &DetectiveProfile::default(), &story)
        .await
        .expect("transcript renders");

    assert!(transcript.contains("# The poisoning at Harrowgate Manor"));
    assert!(transcript.contains("## What the reader knows"));
    assert!(transcript.contains("Celia Harrow killed Edmund Harrow"));
    assert!(transcript.contains("Plot point 1"));

    // Reader-layer annotations render only as quoted reveal lines.
    for line in transcript.lines() {
        if line.contains("*The detective believes:*") {
            assert!(!line.contains("Celia"), "layer leak in transcript: {}", line);
        }
    }
}

#[tokio::test]
async fn test_story_serializes_for_downstream_consumers() {
    let story = generate().await;
    let json = serde_json::to_string(&story).expect("serialize");
    let back: GeneratedStory = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.plot_points().len(), story.plot_points().len());
}
