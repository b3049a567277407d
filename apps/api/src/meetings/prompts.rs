// Prompt templates for the meeting endpoints.

/// Meeting extraction. Replace `{title}` and `{notes}` before sending.
pub const MEETING_EXTRACT_PROMPT_TEMPLATE: &str = r#"Read these notes from a career conversation and pull out what matters.

MEETING: {title}

NOTES OR TRANSCRIPT:
{notes}

OUTPUT (JSON only):
{
  "summary": "2-3 sentences on what was discussed and decided",
  "highlights": [
    "A specific insight, piece of advice or encouraging moment"
  ],
  "actionItems": [
    {
      "text": "Concrete next step, starting with a verb",
      "priority": "high/medium/low",
      "due": "When it should happen, e.g. 'This week' or 'Before next session'",
      "owner": "Who does it, if the notes say"
    }
  ]
}

RULES:
- 2-4 highlights, quoting or paraphrasing the notes
- Only action items the notes support; do not invent commitments
- Leave "due" out when the notes give no timing

Return ONLY valid JSON."#;

/// Follow-up suggestions. Replace `{recent_meetings}`, `{current_meeting}`
/// and `{user_context}` with JSON before sending.
pub const FOLLOWUPS_PROMPT_TEMPLATE: &str = r#"Suggest follow-ups for someone working through a career transition.

RECENT MEETINGS (newest first):
{recent_meetings}

CURRENT MEETING:
{current_meeting}

ABOUT THEM:
{user_context}

YOUR TASK:
Look across the meetings for threads that were started but not finished, and
suggest the next few moves that keep momentum without piling on work.

OUTPUT (JSON only):
{
  "context": "One sentence on where they are, based on the meetings",
  "suggestions": [
    {
      "action": "Specific follow-up",
      "reason": "Which meeting or commitment this builds on",
      "priority": "high/medium/low",
      "timing": "When, e.g. 'This week'"
    }
  ]
}

RULES:
- 2-4 suggestions
- Reference details from the meetings, not generic advice

Return ONLY valid JSON."#;
