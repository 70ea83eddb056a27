use crate::core::error::AitripError;
use crate::providers::{Message, PlanProvider, Role};
use async_trait::async_trait;

const ITINERARY_REPLY: &str = "Planned a 5-day Kyoto trip for you: Day 1 Kiyomizu-dera, \
Day 2 Arashiyama, Day 3 Kinkaku-ji, Day 4 Fushimi Inari, Day 5 Nishiki Market.";
const HOTEL_REPLY: &str = "Recommended The Ritz-Carlton Kyoto, rated 4.9, right on the \
Kamo River.";
const ACK_REPLY: &str = "All set, I've arranged that for you!";

/// Deterministic canned reply for a traveler command. Keyword matching
/// covers English and Chinese phrasings; anything else gets a plain
/// acknowledgement. Never emits an update block.
pub fn canned_reply(command: &str) -> &'static str {
    let command = command.to_lowercase();
    if ["itinerary", "plan", "行程", "规划"]
        .iter()
        .any(|kw| command.contains(kw))
    {
        ITINERARY_REPLY
    } else if ["hotel", "酒店"].iter().any(|kw| command.contains(kw)) {
        HOTEL_REPLY
    } else {
        ACK_REPLY
    }
}

/// Zero-configuration local backend. Lets the whole shell run end to end
/// with no token and no network.
#[derive(Debug)]
pub struct SimulatorProvider;

#[async_trait]
impl PlanProvider for SimulatorProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AitripError> {
        let command = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");
        Ok(canned_reply(command).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_select_the_scenario_reply() {
        assert_eq!(canned_reply("Plan me an itinerary for Kyoto"), ITINERARY_REPLY);
        assert_eq!(canned_reply("帮我规划一下行程"), ITINERARY_REPLY);
        assert_eq!(canned_reply("Any hotel suggestions?"), HOTEL_REPLY);
        assert_eq!(canned_reply("推荐一家酒店"), HOTEL_REPLY);
        assert_eq!(canned_reply("thanks!"), ACK_REPLY);
    }

    #[tokio::test]
    async fn provider_answers_the_last_user_turn() {
        let reply = SimulatorProvider
            .get_response(&[
                Message::system("ignored"),
                Message::user("book a hotel please"),
            ])
            .await
            .unwrap();
        assert_eq!(reply, HOTEL_REPLY);
    }
}
