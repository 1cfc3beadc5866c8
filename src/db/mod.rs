pub mod recommendation_queries;
