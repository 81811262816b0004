//! Prompt slices used to drive an agent through a task.

/// Opening of the system prompt: who the agent is.
const ROLE_PLAYING: &str = "You are {role}. {backstory}\nYour personal goal is: {goal}";

/// Answer-format instructions for agents without tools.
const NO_TOOLS: &str = "\nTo give my best complete final answer to the task respond using the exact following format:\n\n\
Thought: I now can give a great answer\n\
Final Answer: Your final answer must be the great and the most complete as possible, it must be outcome described.\n\n\
I MUST use these formats, my job depends on it!";

const TASK_NO_TOOLS: &str = "\nCurrent Task: {input}\n\n\
Begin! This is VERY important to you, your job depends on it!\n\nThought:";

const EXPECTED_OUTPUT: &str = "\nThis is the expected criteria for your final answer: {expected_output}\n\
you MUST return the actual complete content as the final answer, not a summary.";

const TASK_WITH_CONTEXT: &str = "{task}\n\nThis is the context you're working with:\n{context}";

const FORCE_FINAL_ANSWER: &str = "I did it wrong. I must give my best final answer now, \
using the exact format:\n\nThought: I now can give a great answer\nFinal Answer: my complete answer";

/// Agent fields needed for prompt interpolation.
pub struct AgentInfo<'a> {
    pub role: &'a str,
    pub goal: &'a str,
    pub backstory: &'a str,
}

/// System prompt: role playing plus answer format.
pub fn system_prompt(agent: &AgentInfo<'_>) -> String {
    format!("{}{}", ROLE_PLAYING, NO_TOOLS)
        .replace("{goal}", agent.goal)
        .replace("{role}", agent.role)
        .replace("{backstory}", agent.backstory)
}

/// Task description followed by the expected-output criteria.
pub fn task_prompt(description: &str, expected_output: &str) -> String {
    format!(
        "{}{}",
        description,
        EXPECTED_OUTPUT.replace("{expected_output}", expected_output)
    )
}

/// User prompt for one task, with the outputs of earlier tasks when present.
pub fn user_prompt(task_prompt: &str, context: Option<&str>) -> String {
    let input = match context {
        Some(ctx) if !ctx.trim().is_empty() => TASK_WITH_CONTEXT
            .replace("{task}", task_prompt)
            .replace("{context}", ctx),
        _ => task_prompt.to_string(),
    };
    TASK_NO_TOOLS.replace("{input}", &input)
}

/// Follow-up sent when the model answered without a usable final answer.
pub fn force_final_answer() -> &'static str {
    FORCE_FINAL_ANSWER
}
