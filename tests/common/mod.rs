#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use nc_news::{
    Dataset,
    models::{Article, Comment, Topic, User},
};

// --- Test Data ---
//
// A small copy of the development fixtures: 3 topics, 4 users, 12 articles
// and 9 comments. Article 1 starts on 100 votes, article 2 has no comments,
// article 3 has two.

pub const IMG: &str = concat!(
    "https://images.pexels.com/photos/158651/",
    "news-newsletter-newspaper-information-158651.jpeg?w=700&h=700"
);

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn topic(slug: &str, description: &str) -> Topic {
    Topic {
        slug: slug.into(),
        description: description.into(),
    }
}

fn user(username: &str, name: &str) -> User {
    User {
        username: username.into(),
        name: name.into(),
        avatar_url: format!("https://avatars.example.com/{username}.png"),
    }
}

fn article(
    article_id: i32,
    title: &str,
    topic: &str,
    author: &str,
    created: i64,
    votes: i32,
) -> Article {
    Article {
        article_id,
        author: author.into(),
        title: title.into(),
        body: format!("{title}: the full text."),
        topic: topic.into(),
        created_at: at(created),
        votes,
        article_img_url: IMG.into(),
    }
}

fn comment(comment_id: i32, article_id: i32, author: &str, votes: i32, created: i64) -> Comment {
    Comment {
        comment_id,
        body: format!("comment {comment_id}"),
        votes,
        author: author.into(),
        article_id,
        created_at: at(created),
    }
}

pub fn topics() -> Vec<Topic> {
    vec![
        topic("mitch", "The man, the Mitch, the legend"),
        topic("cats", "Not dogs"),
        topic("paper", "what books are made of"),
    ]
}

pub fn users() -> Vec<User> {
    vec![
        user("butter_bridge", "jonny"),
        user("icellusedkars", "sam"),
        user("rogersop", "paul"),
        user("lurker", "do_nothing"),
    ]
}

pub fn articles() -> Vec<Article> {
    vec![
        article(
            1,
            "Living in the shadow of a great man",
            "mitch",
            "butter_bridge",
            1_594_329_060,
            100,
        ),
        article(2, "Sony Vaio; or, The Laptop", "mitch", "icellusedkars", 1_602_828_180, 0),
        article(
            3,
            "Eight pug gifs that remind me of mitch",
            "mitch",
            "icellusedkars",
            1_604_394_720,
            0,
        ),
        article(4, "Student SUES Mitch!", "mitch", "rogersop", 1_588_731_240, 0),
        article(
            5,
            "UNCOVERED: catspiracy to bring down democracy",
            "cats",
            "rogersop",
            1_596_464_040,
            0,
        ),
        article(6, "A", "mitch", "icellusedkars", 1_602_986_400, 0),
        article(7, "Z", "mitch", "icellusedkars", 1_578_406_080, 0),
        article(8, "Does Mitch predate civilisation?", "mitch", "icellusedkars", 1_587_089_280, 0),
        article(
            9,
            "They're not exactly dogs, are they?",
            "mitch",
            "butter_bridge",
            1_591_438_200,
            0,
        ),
        article(
            10,
            "Seven inspirational thought leaders from Manchester UK",
            "mitch",
            "rogersop",
            1_589_433_300,
            0,
        ),
        article(11, "Am I a cat?", "mitch", "icellusedkars", 1_579_126_860, 0),
        article(12, "Moustache", "mitch", "butter_bridge", 1_602_419_040, 0),
    ]
}

pub fn comments() -> Vec<Comment> {
    vec![
        comment(1, 9, "butter_bridge", 16, 1_586_179_020),
        comment(2, 1, "butter_bridge", 14, 1_604_113_380),
        comment(3, 1, "icellusedkars", 100, 1_583_025_180),
        comment(4, 1, "icellusedkars", -100, 1_582_459_260),
        comment(5, 3, "icellusedkars", 0, 1_600_560_600),
        comment(6, 3, "butter_bridge", 0, 1_605_745_260),
        comment(7, 5, "icellusedkars", 0, 1_597_000_000),
        comment(8, 5, "rogersop", 0, 1_598_000_000),
        comment(9, 9, "icellusedkars", 0, 1_601_820_480),
    ]
}

pub fn dataset() -> Dataset {
    Dataset {
        topics: topics(),
        users: users(),
        articles: articles(),
        comments: comments(),
    }
}
