// Prompt templates for the coaching endpoints.
// Placeholders are filled by `CoachingRequest::render`:
// {direction_label}, {background}, {confidence}, {adjustments_line}.

/// "You Are Here" assessment. Observation only, no advice.
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"Generate a deeply personalized "You Are Here" career assessment.

USER'S EXACT INPUT:
- Chosen direction: {direction_label}
- Their background (READ CAREFULLY): {background}
- Confidence level: {confidence}

YOUR TASK:
Create an assessment that makes them feel this actually understands THEIR situation.

PERSONALIZATION RULES:
1. Pull SPECIFIC details from their background: years of experience, tools, industries, education, projects.
2. Reference these specifics in the assessment instead of generic statements.
3. If they mention a previous field, acknowledge it and how it transfers.
4. If they mention tools or skills, include them in assets.

OUTPUT (JSON only):
{
  "stage": {
    "label": "One of: 'Early Exploration', 'Building Foundation', 'Active Development', 'Transition Ready', or a fitting one",
    "description": "One sentence about where THEY are. Reference their background."
  },
  "assets": [
    {
      "text": "Something specific they already have, based on what they wrote",
      "signal": "Why this matters for their direction"
    }
  ],
  "gaps": [
    {
      "text": "What is not yet in place (never say lack, missing or behind)",
      "note": "Normalize it: this is common or develops with time"
    }
  ],
  "readiness": [
    {"name": "Clarity of direction", "level": "developing/moderate/high", "note": "Based on their confidence and what they shared"},
    {"name": "Foundational knowledge", "level": "developing/moderate/high", "note": "Based on education or learning they mentioned"},
    {"name": "Practical experience", "level": "developing/moderate/high", "note": "Based on projects or work they mentioned"}
  ],
  "transition": "Gentle transition that acknowledges their situation. No advice."
}

RULES:
- 2-4 assets, each referencing something SPECIFIC from their background
- 2-3 gaps at most
- This is observation, not advice

Return ONLY valid JSON."#;

/// Mentor match with session preparation.
pub const MENTOR_PROMPT_TEMPLATE: &str = r#"Create a personalized mentor recommendation with specific session prep.

USER'S SITUATION:
- Direction: {direction_label}
- Their background: {background}
- Confidence: {confidence}
{adjustments_line}

YOUR TASK:
1. Recommend a mentor whose experience addresses THIS user's gaps.
2. Describe what the first session will cover for them.
3. Suggest specific questions they should ask.
4. Tell them exactly what to prepare.

OUTPUT (JSON only):
{
  "mentor": {
    "name": "Realistic full name",
    "title": "Role at Company",
    "experience": "X years in the relevant field",
    "initials": "XX",
    "specialties": ["3 areas relevant to the user's gaps"],
    "approach": "One sentence about mentoring style"
  },
  "matchReasons": [
    {"title": "Specific reason", "text": "2-3 sentences referencing THEIR background"}
  ],
  "sessionExpectations": [
    {"topic": "Topic based on their gaps", "outcome": "What they will understand after", "why": "Why this matters for them"}
  ],
  "questionsToAsk": [
    {"question": "Question based on their situation", "context": "Why this question matters for them"}
  ],
  "whatToPrepare": [
    {"item": "Thing to prepare", "why": "How this helps the session", "howTo": "Brief instruction"}
  ]
}

RULES:
- 2-3 match reasons referencing their background
- 3 session expectations
- 3-4 questions to ask
- 2-3 preparation items
- Generic items such as "learn about the industry" or "prepare questions" are not allowed

Return ONLY valid JSON."#;

/// 90-day execution plan. The largest response; the only one that gets
/// truncation repair.
pub const PLAN_PROMPT_TEMPLATE: &str = r#"Create a personalized, actionable 90-day execution plan.

USER'S SITUATION:
- Direction: {direction_label}
- Background: {background}
- Confidence: {confidence}
{adjustments_line}

TASK: Create a specific, actionable plan for THIS person. Reference their background.

OUTPUT (JSON only):
{
  "directionConfirmation": "2-3 sentences connecting their background to this direction.",
  "hardSkills": [
    {
      "skill": "Skill name",
      "why": "Why this matters for them",
      "priority": "essential/important/foundational",
      "currentLevel": "Where they are",
      "targetLevel": "Where to be",
      "resource": "One specific course or book",
      "practiceProject": "One project idea"
    }
  ],
  "softSkills": [
    {"skill": "Name", "why": "Why it matters", "dailyPractice": "Daily habit"}
  ],
  "tools": [
    {"name": "Tool", "why": "Why needed", "getStarted": "First step"}
  ],
  "phasedPath": {
    "day30": {"theme": "Foundation", "goals": ["Goal"], "tasks": [{"task": "Task", "deliverable": "Output", "estimatedHours": "X hours"}], "milestone": "Success marker"},
    "day60": {"theme": "Building", "goals": ["Goal"], "tasks": [{"task": "Task", "deliverable": "Output", "estimatedHours": "X hours"}], "milestone": "Success marker"},
    "day90": {"theme": "Momentum", "goals": ["Goal"], "tasks": [{"task": "Task", "deliverable": "Output", "estimatedHours": "X hours"}], "milestone": "Success marker"}
  },
  "weeklyActions": [
    {"action": "Habit", "frequency": "How often", "why": "Why"}
  ],
  "quickWins": [
    {"action": "Do today", "impact": "Why", "steps": ["Step 1", "Step 2"]}
  ],
  "potentialBlockers": [
    {"blocker": "Challenge", "solution": "How to get past it"}
  ],
  "successMetrics": [
    {"metric": "Measure", "target30": "30-day", "target60": "60-day", "target90": "90-day"}
  ],
  "closingReassurance": "2-3 calm sentences referencing their background."
}

RULES:
- 4 hard skills with resources and projects
- 3 soft skills, 4 tools, 3 tasks per phase
- 2 quick wins, 2 blockers, 2 metrics, 2 weekly actions
- Keep every field concise

Return ONLY valid JSON, no markdown."#;
