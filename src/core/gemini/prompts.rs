use serde_json::{json, Value};

pub const DETECTION_PROMPT: &str = r#"
Identify and return the bounding boxes for ALL sensitive or identifiable information that must be blurred for privacy:
1. ALL vehicle license plates.
2. ALL human faces.
3. Identifiable animal faces.
4. ALL advertisements, company names, logos, branding, or promotional text on vehicles or the environment.

Return a JSON array of objects with fields: "label" ("plate", "face", "ad"), "ymin", "xmin", "ymax", "xmax".
Coordinates normalized 0-1000.
"#;

/// 评分策略模板，`{lang}` 会替换成界面语言代码
const ANALYSIS_PROMPT_TEMPLATE: &str = r#"
You are a strictly objective civic parking assistant. Your goal is to validate parking reports with high precision.
Language: {lang}.

**Step 1: Strict Validation**
- **Quality Check**: Reject if blurry, dark, low resolution, or if the vehicle/context is ambiguous.
- **Violation Check**: Must see CLEAR visual evidence (lines, signs, obstruction). No assumptions.
- **Privacy**: Confirm sensitive data (faces/plates) is blurred (automatic pass if pre-blurred).

**Step 2: Scoring Engine**
- **Base Points**: +5 for any high-quality, clear submission.
- **Violation Bonus**: +15 if a parking violation is CONFIRMED.
- **Confidence Bonus**: +5 if your confidence > 90%.
- *Total Calculation*: Sum these up. Max possible single report = 25.

**Step 3: Output Generation**
- **headline**: Professional, clear title (e.g., "Sidewalk Obstruction", "Double Parking Detected").
- **points**: The calculated total from Step 2.
- **reasoning**: Helpful feedback.
    - If Approved: "Great catch! Evidence is clear."
    - If Rejected: "Photo does not clearly show a violation. Try capturing road markings."
- **idiocyScore**: 0-100, strictly the likelihood of a violation.
- **idiocyCategory**: The specific violation type (e.g., "Bike Lane Blockage").
- **isVehicle**: true if a vehicle is present.
- **confidence**: 0-100.
- **rejectionReason**:
    - "LOW_QUALITY" (Blurry/Dark)
    - "NO_VIOLATION" (Legal parking or unclear)
    - "UNCERTAIN_VIOLATION" (Confidence < 80%)

**Step 4: Rejection Trigger**
- If Quality Fail OR Confidence < 80%: Return points: 0, isVehicle: false, rejectionReason set.

Return JSON.
"#;

pub fn analysis_prompt(language: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{lang}", language)
}

pub fn venue_prompt(lat: f64, lng: f64, query: Option<&str>) -> String {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => format!(
            "Find the location for \"{}\" near Lat: {}, Lng: {}. List the top 5 most relevant places.",
            q, lat, lng
        ),
        None => format!(
            "List the top 5 businesses or landmarks exactly at or immediately surrounding Lat: {}, Lng: {}.",
            lat, lng
        ),
    }
}

pub fn detection_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "label": { "type": "STRING" },
                "ymin": { "type": "NUMBER" },
                "xmin": { "type": "NUMBER" },
                "ymax": { "type": "NUMBER" },
                "xmax": { "type": "NUMBER" }
            },
            "required": ["label", "ymin", "xmin", "ymax", "xmax"]
        }
    })
}

pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "headline": { "type": "STRING" },
            "points": { "type": "NUMBER" },
            "reasoning": { "type": "STRING" },
            "idiocyScore": { "type": "NUMBER" },
            "idiocyCategory": { "type": "STRING" },
            "isVehicle": { "type": "BOOLEAN" },
            "confidence": { "type": "NUMBER" },
            "rejectionReason": { "type": "STRING", "nullable": true }
        },
        "required": [
            "headline", "points", "reasoning", "idiocyScore",
            "idiocyCategory", "isVehicle", "confidence"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_embeds_language() {
        let prompt = analysis_prompt("fr");
        assert!(prompt.contains("Language: fr."));
        assert!(!prompt.contains("{lang}"));
    }

    #[test]
    fn test_venue_prompt_with_and_without_query() {
        let nearby = venue_prompt(52.37, 4.89, None);
        assert!(nearby.starts_with("List the top 5"));

        let blank = venue_prompt(52.37, 4.89, Some("   "));
        assert_eq!(blank, nearby);

        let search = venue_prompt(52.37, 4.89, Some("Central Station"));
        assert!(search.contains("\"Central Station\""));
    }
}
